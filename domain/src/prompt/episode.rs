//! Prompt templates for an episode

use crate::task::TaskDefinition;
use crate::tool::{ToolCapability, ToolExecutionResult, ToolRegistry, ToolSearchHit};

/// Templates for the messages the engine sends to the model
pub struct EpisodePromptTemplate;

impl EpisodePromptTemplate {
    /// System prompt: task, tag grammar, catalog and the completion phrase.
    ///
    /// The catalog lists names and categories only. Parameters and errors
    /// are revealed through search and info queries.
    pub fn system(task: &TaskDefinition, registry: &ToolRegistry) -> String {
        let catalog = registry
            .all()
            .map(|t| format!("- {} ({})", t.name, t.kind()))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a workflow agent that completes tasks by calling tools.

## Task

{description}

## Actions

Respond with one or more of these tags:

- <tool_search>what you need</tool_search> finds tools matching a description
- <tool_info>tool_name</tool_info> shows a tool's parameters, outputs and errors
- <tool_call>tool_name</tool_call> executes a tool

Tags are case-sensitive. Several <tool_call> tags in one response run in order.
A response that contains a search or info tag is answered with results only;
its tool calls are not executed.

## Available Tools

{catalog}

## Guidelines

1. Call tools in the order the workflow needs them
2. If a tool fails, read the error and decide whether to retry it
3. Do not repeat a tool that already succeeded unless the workflow needs it again
4. When every step is done, say "Task completed""#,
            description = Self::task_description(task),
            catalog = catalog,
        )
    }

    /// Opening user message.
    pub fn task_prompt(task: &TaskDefinition) -> String {
        format!(
            "Task {}: {}\n\nStart by deciding which tool to use first.",
            task.task_id,
            Self::task_description(task)
        )
    }

    fn task_description(task: &TaskDefinition) -> &str {
        if task.description.trim().is_empty() {
            "Complete the workflow using the available tools."
        } else {
            task.description.trim()
        }
    }

    /// Full descriptor block for one tool.
    pub fn describe_tool(tool: &ToolCapability) -> String {
        let mut out = format!("### {} ({})\n", tool.name, tool.kind());
        if !tool.description.is_empty() {
            out.push_str(&format!("{}\n", tool.description));
        }

        if tool.parameters.is_empty() {
            out.push_str("Parameters: none\n");
        } else {
            out.push_str("Parameters:\n");
            for p in &tool.parameters {
                let required = if p.required { " (required)" } else { "" };
                let default = p
                    .default
                    .as_ref()
                    .map(|d| format!(" [default: {}]", d))
                    .unwrap_or_default();
                out.push_str(&format!("  - {}: {}{}{}\n", p.name, p.param_type, required, default));
            }
        }

        if !tool.returns.is_empty() {
            let returns = tool
                .returns
                .iter()
                .map(|r| format!("{}: {}", r.name, r.return_type))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("Returns: {}\n", returns));
        }

        if !tool.errors.is_empty() {
            out.push_str("Errors:\n");
            for e in &tool.errors {
                out.push_str(&format!("  - {}: {}\n", e.code, e.description));
            }
        }

        if !tool.dependencies.is_empty() {
            out.push_str(&format!("Depends on: {}\n", tool.dependencies.join(", ")));
        }
        out
    }

    /// Results for every search query of one turn.
    pub fn search_results(results: &[(String, Vec<ToolSearchHit>)]) -> String {
        let mut out = String::new();
        for (query, hits) in results {
            out.push_str(&format!("Search results for \"{}\":\n\n", query));
            if hits.is_empty() {
                out.push_str("No matching tools.\n\n");
                continue;
            }
            for (i, hit) in hits.iter().enumerate() {
                out.push_str(&format!("{}. score {:.2}\n", i + 1, hit.score));
                out.push_str(&Self::describe_tool(&hit.descriptor));
                out.push('\n');
            }
        }
        out.push_str("Use <tool_call>tool_name</tool_call> to execute a tool.");
        out
    }

    /// Answer to every info query of one turn.
    pub fn tool_info(queries: &[String], registry: &ToolRegistry) -> String {
        let mut blocks = Vec::with_capacity(queries.len());
        for name in queries {
            match registry.get_resolved(name) {
                Some(tool) => blocks.push(Self::describe_tool(tool)),
                None => {
                    let suggestions = registry.suggestions(name, 3);
                    let hint = if suggestions.is_empty() {
                        String::new()
                    } else {
                        format!(" Did you mean: {}?", suggestions.join(", "))
                    };
                    blocks.push(format!("Unknown tool '{}'.{}\n", name, hint));
                }
            }
        }
        blocks.join("\n")
    }

    /// Results of one batch of tool executions.
    pub fn tool_results(
        results: &[ToolExecutionResult],
        dropped: &[String],
        pending_required: usize,
    ) -> String {
        let mut out = String::from("Tool execution results:\n");
        for r in results {
            match (&r.output, r.error()) {
                (_, Some(failure)) => {
                    out.push_str(&format!("- {}: FAILED {}\n", r.tool_name, failure));
                }
                (Some(output), None) => {
                    out.push_str(&format!("- {}: SUCCESS {}\n", r.tool_name, output));
                }
                (None, None) => {
                    out.push_str(&format!("- {}: SUCCESS\n", r.tool_name));
                }
            }
        }
        for name in dropped {
            out.push_str(&format!(
                "- {}: not executed, no such tool. Search for a matching tool first.\n",
                name
            ));
        }
        if pending_required == 0 {
            out.push_str("\nIf the workflow is finished, say \"Task completed\".");
        } else {
            out.push_str("\nContinue with the next step.");
        }
        out
    }

    /// Reply to a completion claim made while required steps are missing.
    pub fn premature_completion(pending_required: usize) -> String {
        let steps = if pending_required == 1 { "step is" } else { "steps are" };
        format!(
            "The task is not finished yet: {} required {} still not completed successfully. \
             Continue with <tool_call>tool_name</tool_call>.",
            pending_required, steps
        )
    }

    /// Neutral nudge when a turn produced nothing to answer.
    pub fn continuation() -> &'static str {
        "Continue. Use <tool_search>, <tool_info> or <tool_call> tags to make progress."
    }
}
