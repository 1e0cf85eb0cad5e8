//! Configuration schema for calldash.toml.
//!
//! The settings file holds only non-secret values. Credentials are read from
//! the environment into [`Secrets`](super::Secrets).

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Name the worker registers under with the voice runtime.
    pub agent_name: String,

    /// Log level (debug, info, warn, error).
    pub log_level: String,

    /// Remote configuration store.
    pub firestore: FirestoreSettings,

    /// LiveKit server used to end calls.
    pub livekit: LiveKitSettings,

    /// SMTP relay for the send_email tool.
    pub smtp: SmtpSettings,

    /// Dynamic tool construction and invocation.
    pub tools: ToolSettings,

    pub llm: LlmSettings,
    pub stt: SttSettings,
    pub tts: TtsSettings,
    pub vad: VadSettings,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            agent_name: "calldash-agent".into(),
            log_level: "info".into(),
            firestore: FirestoreSettings::default(),
            livekit: LiveKitSettings::default(),
            smtp: SmtpSettings::default(),
            tools: ToolSettings::default(),
            llm: LlmSettings::default(),
            stt: SttSettings::default(),
            tts: TtsSettings::default(),
            vad: VadSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirestoreSettings {
    /// Firebase project id. Empty disables the remote store.
    pub project_id: String,
    pub base_url: String,
    pub collection: String,
    pub document: String,
    pub timeout_secs: u64,
}

impl Default for FirestoreSettings {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            base_url: "https://firestore.googleapis.com/v1".into(),
            collection: "configurations".into(),
            document: "current".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveKitSettings {
    /// Server URL. Empty means calls end through job shutdown only.
    pub url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Upgrade the connection with STARTTLS. Disable only for local relays.
    pub starttls: bool,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".into(),
            port: 587,
            starttls: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Timeout for each outbound tool request.
    pub http_timeout_secs: u64,

    /// Upper bound on declared parameters per tool.
    pub max_parameters: usize,

    /// Characters of each response kept in log lines.
    pub log_preview_chars: usize,

    /// Endpoint used by search_web when its descriptor has no URL.
    pub search_url: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            http_timeout_secs: 30,
            max_parameters: 32,
            log_preview_chars: 500,
            search_url: "https://api.duckduckgo.com/".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub model: String,
    pub temperature: f64,
    pub max_completion_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-nano".into(),
            temperature: 0.7,
            max_completion_tokens: 750,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SttSettings {
    pub provider: String,
    pub model: String,
    pub language: String,
    pub detect_language: bool,
    pub interim_results: bool,
    pub punctuate: bool,
    pub endpointing_ms: u32,
}

impl Default for SttSettings {
    fn default() -> Self {
        Self {
            provider: "deepgram".into(),
            model: "nova-2-general".into(),
            language: "en-US".into(),
            detect_language: false,
            interim_results: true,
            punctuate: true,
            endpointing_ms: 425,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsSettings {
    pub provider: String,
    pub model: String,
    pub voice: String,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            model: "tts-1".into(),
            voice: "nova".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VadSettings {
    pub min_speech_duration: f64,
    pub min_silence_duration: f64,
    pub padding_duration: f64,
    pub sample_rate: u32,
    pub max_buffered_speech: f64,
}

impl Default for VadSettings {
    fn default() -> Self {
        Self {
            min_speech_duration: 0.1,
            min_silence_duration: 0.3,
            padding_duration: 0.3,
            sample_rate: 16000,
            max_buffered_speech: 60.0,
        }
    }
}
