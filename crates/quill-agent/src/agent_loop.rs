//! Agent loop - the core state machine
//!
//! One run alternates between awaiting the model and executing the
//! tools it requested, bounded by an iteration ceiling. Tool faults
//! fold back into the transcript as text; only transport failures,
//! the iteration limit, and a corrupt history abort the run.

use std::sync::Arc;
use tracing::{debug, warn};

use quill_config::Config;
use quill_history::HistoryStore;
use quill_provider::{ChatParams, Message, Provider, ToolCallDef};

use crate::context;
use crate::events::{EventSink, NullSink};
use crate::tools::{self, ToolRegistry};
use crate::{AgentError, Result};

pub struct AgentLoop<P: Provider> {
    provider: Arc<P>,
    model: String,
    max_iterations: u32,
    tools: ToolRegistry,
    store: HistoryStore,
    sink: Box<dyn EventSink>,
}

impl<P: Provider> AgentLoop<P> {
    /// Create a loop with the built-in tools registered against the
    /// configured sandbox root
    pub fn new(provider: P, config: &Config, store: HistoryStore) -> Self {
        let mut registry = ToolRegistry::new();
        tools::register_default_tools(&mut registry, config);

        Self {
            provider: Arc::new(provider),
            model: config.provider.model.clone(),
            max_iterations: config.agent.max_iterations,
            tools: registry,
            store,
            sink: Box::new(NullSink),
        }
    }

    /// Install a presentation sink for tool dispatch events
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run one prompt to completion.
    ///
    /// History is loaded once up front and persisted exactly once on
    /// the way out, on success and on abort alike, so the transcript
    /// up to the last append always survives.
    pub async fn run(&self, prompt: &str) -> Result<String> {
        let mut messages = self.store.load().await?;
        context::seed(&mut messages);
        messages.push(Message::user(prompt));

        let result = self.drive(&mut messages).await;

        if let Err(e) = self.store.save(&messages).await {
            warn!("failed to persist history: {}", e);
        }

        result
    }

    async fn drive(&self, messages: &mut Vec<Message>) -> Result<String> {
        for iteration in 1..=self.max_iterations {
            debug!("agent iteration {}", iteration);

            let params = ChatParams {
                model: self.model.clone(),
                messages: messages.clone(),
                tools: self.tools.definitions(),
            };

            // A transport failure aborts immediately; no retry.
            let response = self
                .provider
                .chat(params)
                .await
                .map_err(|e| AgentError::Provider(e.to_string()))?;

            if response.has_tool_calls() {
                let tool_call_defs: Vec<ToolCallDef> = response
                    .tool_calls
                    .iter()
                    .map(|tc| ToolCallDef::new(&tc.id, &tc.name, tc.arguments.clone()))
                    .collect();

                context::add_assistant_message(
                    messages,
                    response.content.as_deref(),
                    Some(tool_call_defs),
                );

                // Sequential, in request order: later calls may depend
                // on earlier side effects, and the result ordering fed
                // back to the model must be deterministic.
                for tool_call in &response.tool_calls {
                    self.sink.on_tool_call(&tool_call.name, &tool_call.arguments);
                    let result = self.tools.dispatch(tool_call).await;
                    self.sink.on_tool_result(&tool_call.name, &result);

                    context::add_tool_result(messages, &tool_call.id, &tool_call.name, &result);
                }
            } else {
                let answer = response
                    .content
                    .unwrap_or_else(|| "Task completed.".to_string());
                context::add_assistant_message(messages, Some(&answer), None);
                return Ok(answer);
            }
        }

        Err(AgentError::IterationLimit(self.max_iterations))
    }
}
