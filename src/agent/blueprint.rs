//! Agent blueprint: everything the voice runtime needs to start a session.

use super::system_prompt::build_instructions;
use crate::config::schema::{LlmSettings, SttSettings, TtsSettings, VadSettings};
use crate::config::AgentSettings;
use crate::store::{session_instruction, ConfigService};
use crate::tools::{ToolContext, ToolDefinition, ToolSet};
use serde::Serialize;
use tracing::info;

/// Assembled agent: instructions, tools and provider settings.
#[derive(Debug, Clone)]
pub struct AgentBlueprint {
    pub agent_name: String,
    pub instructions: String,
    /// Spoken at session start to open the conversation.
    pub session_instruction: String,
    pub tools: ToolSet,
    pub llm: LlmSettings,
    pub stt: SttSettings,
    pub tts: TtsSettings,
    pub vad: VadSettings,
}

/// Serializable view of a blueprint.
#[derive(Debug, Serialize)]
pub struct BlueprintView<'a> {
    pub agent_name: &'a str,
    pub instructions: &'a str,
    pub session_instruction: &'a str,
    pub llm: &'a LlmSettings,
    pub stt: &'a SttSettings,
    pub tts: &'a TtsSettings,
    pub vad: &'a VadSettings,
    pub tools: Vec<ToolDefinition>,
    pub skipped_tools: Vec<SkippedTool>,
}

#[derive(Debug, Serialize)]
pub struct SkippedTool {
    pub name: String,
    pub reason: String,
}

impl AgentBlueprint {
    /// Load the configuration, build the tools and render the prompt.
    pub async fn assemble(
        settings: &AgentSettings,
        store: &ConfigService,
        ctx: &ToolContext,
    ) -> Self {
        let config = store.load_configuration().await;
        let tools = ToolSet::from_descriptors(&config.tools, ctx);
        log_inventory(&tools);

        Self {
            agent_name: settings.agent_name.clone(),
            instructions: build_instructions(&config.agent_instruction, &tools),
            session_instruction: session_instruction(&config.begin_message),
            tools,
            llm: settings.llm.clone(),
            stt: settings.stt.clone(),
            tts: settings.tts.clone(),
            vad: settings.vad.clone(),
        }
    }

    pub fn view(&self) -> BlueprintView<'_> {
        BlueprintView {
            agent_name: &self.agent_name,
            instructions: &self.instructions,
            session_instruction: &self.session_instruction,
            llm: &self.llm,
            stt: &self.stt,
            tts: &self.tts,
            vad: &self.vad,
            tools: self.tools.definitions(),
            skipped_tools: self
                .tools
                .skipped()
                .iter()
                .map(|(name, e)| SkippedTool {
                    name: name.clone(),
                    reason: e.to_string(),
                })
                .collect(),
        }
    }
}

fn log_inventory(tools: &ToolSet) {
    info!("=== AGENT TOOLS AVAILABLE ===");
    for (i, tool) in tools.iter().enumerate() {
        info!("Tool {}: {} - {}", i + 1, tool.name(), tool.description());
    }
    info!("Total tools available: {}", tools.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_offline_assembly_uses_defaults() {
        let settings = AgentSettings::default();
        let blueprint =
            AgentBlueprint::assemble(&settings, &ConfigService::offline(), &ToolContext::offline())
                .await;

        assert_eq!(blueprint.tools.names(), vec!["search_web", "end_call"]);
        assert!(blueprint
            .instructions
            .starts_with(crate::store::defaults::DEFAULT_AGENT_INSTRUCTION));
        assert!(blueprint.session_instruction.contains("Begin the conversation by saying:"));
        assert_eq!(blueprint.llm.model, "gpt-4.1-nano");
    }

    #[tokio::test]
    async fn test_view_serializes_provider_settings_and_tools() {
        let blueprint = AgentBlueprint::assemble(
            &AgentSettings::default(),
            &ConfigService::offline(),
            &ToolContext::offline(),
        )
        .await;

        let json = serde_json::to_value(blueprint.view()).unwrap();
        assert_eq!(json["agent_name"], "calldash-agent");
        assert_eq!(json["tts"]["voice"], "nova");
        assert_eq!(json["stt"]["endpointing_ms"], 425);
        assert_eq!(json["tools"][0]["name"], "search_web");
        assert_eq!(json["skipped_tools"], serde_json::json!([]));
    }
}
