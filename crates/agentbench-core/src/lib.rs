use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

pub type Result<T> = anyhow::Result<T>;

/// File name of the per-eval outcome record inside an execution directory.
pub const SUMMARY_FILE: &str = "summary.json";

/// Harness label reported when an experiment's configuration cannot be
/// located or parsed.
pub const UNKNOWN_HARNESS: &str = "Unknown";

/// One execution's recorded outcome for one eval, as produced upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalSummary {
    pub total_runs: u64,
    pub passed_runs: u64,
    pub mean_duration: f64,
    #[serde(default)]
    pub valid: Option<bool>,
}

impl EvalSummary {
    /// An absent `valid` flag means the producer considered the run usable.
    /// Explicit `false` marks infra/timeout failures that must not win.
    pub fn is_valid(&self) -> bool {
        self.valid.unwrap_or(true)
    }
}

/// Derived outcome stored in the exported report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalOutcome {
    pub success: bool,
    /// Mean duration in milliseconds.
    pub duration: f64,
    pub eval_path: String,
    /// Canonical timestamp of the execution the outcome came from.
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResult {
    pub eval_path: String,
    pub result: EvalOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentEntry {
    pub name: String,
    pub timestamp: String,
    pub model_name: String,
    pub agent_harness: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub exported_at: String,
    pub experiments: Vec<ExperimentEntry>,
}

/// Top-level export artifact. `results` keys are display model names;
/// insertion order is preserved so repeated exports are byte-stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub metadata: ReportMetadata,
    pub results: IndexMap<String, Vec<AgentResult>>,
}

fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2})T(\d{2})-(\d{2})-(\d{2})\.(\d+)Z$")
            .expect("timestamp pattern")
    })
}

/// Rewrite a filesystem-safe execution timestamp (`2024-01-02T10-00-00.000Z`)
/// into its RFC 3339 form. Fractional digits are preserved verbatim.
/// Unrecognized input is returned unchanged.
pub fn canonicalize_timestamp(raw: &str) -> String {
    match timestamp_pattern().captures(raw) {
        Some(caps) => format!(
            "{}T{}:{}:{}.{}Z",
            &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]
        ),
        None => raw.to_string(),
    }
}

/// Parse an execution timestamp (either encoding) as an absolute instant.
/// Used for ordering executions, never for display.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&canonicalize_timestamp(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

const MODEL_NAMES: &[(&str, &str)] = &[
    ("claude-opus-4.6", "Claude Opus 4.6"),
    ("claude-opus-4.5", "Claude Opus 4.5"),
    ("claude-opus-4.5-agents-md", "Claude Opus 4.5 + AGENTS.md"),
    ("claude-opus-4.1", "Claude Opus 4.1"),
    ("claude-sonnet-4.5", "Claude Sonnet 4.5"),
    ("claude-sonnet-4.5-agentic-rag", "Claude Sonnet 4.5 + Agentic RAG"),
    ("claude-sonnet-4", "Claude Sonnet 4"),
    ("claude-haiku-4.5", "Claude Haiku 4.5"),
    ("claude-3.7-sonnet", "Claude 3.7 Sonnet"),
    ("gemini-3-pro-preview", "Gemini 3.0 Pro Preview"),
    ("gemini-3-pro-preview-agents-md", "Gemini 3.0 Pro Preview + AGENTS.md"),
    ("gemini-3-flash", "Gemini 3.0 Flash"),
    ("gemini-3-flash-agents-md", "Gemini 3.0 Flash + AGENTS.md"),
    ("gemini-2.5-pro", "Gemini 2.5 Pro"),
    ("gemini-2.5-flash", "Gemini 2.5 Flash"),
    ("gemini-2.5-flash-lite", "Gemini 2.5 Flash Lite"),
    ("gemini-2.0-flash", "Gemini 2.0 Flash"),
    ("gemini-2.0-flash-lite", "Gemini 2.0 Flash Lite"),
    ("gpt-5.2-codex", "GPT 5.2 Codex"),
    ("gpt-5.2-codex-xhigh", "GPT 5.2 Codex (xhigh)"),
    ("gpt-5.3-codex", "GPT 5.3 Codex"),
    ("gpt-5.3-codex-xhigh", "GPT 5.3 Codex (xhigh)"),
    ("gpt-5-codex", "GPT 5 Codex"),
    ("gpt-5", "GPT 5"),
    ("gpt-5-mini", "GPT 5 Mini"),
    ("gpt-5-nano", "GPT 5 Nano"),
    ("gpt-4o", "GPT 4o"),
    ("gpt-4o-mini", "GPT 4o Mini"),
    ("gpt-4.1-mini", "GPT 4.1 Mini"),
    ("gpt-oss-120b", "GPT OSS 120B"),
    ("grok-4", "Grok 4"),
    ("grok-4-fast-reasoning", "Grok 4 Fast Reasoning"),
    ("qwen3-coder", "Qwen3 Coder"),
    ("qwen3-max", "Qwen3 Max"),
    ("kimi-k2-turbo", "Kimi K2 Turbo"),
    ("kimi-k2-0905", "Kimi K2 0905"),
    ("kimi-k2.5", "Kimi K2.5"),
    ("devstral-2", "Devstral 2"),
    ("minimax-m2.1", "Minimax M2.1"),
    ("minimax-m2.1-agents-md", "Minimax M2.1 + AGENTS.md"),
    ("kat-coder-pro-v1", "Kat Coder Pro V1"),
    ("glm-4.6", "GLM 4.6"),
    ("v0-1.5-md", "v0 1.5 MD"),
];

const HARNESS_NAMES: &[(&str, &str)] = &[
    ("claude-code", "Claude Code"),
    ("codex", "Codex"),
    ("vercel-ai-gateway/opencode", "OpenCode"),
];

/// Cosmetic display-name tables: experiment name to model label and agent
/// id to harness label. Lookups fall back to the raw key, so the registry
/// never blocks an export over an unknown identifier.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    models: HashMap<String, String>,
    harnesses: HashMap<String, String>,
}

impl NameRegistry {
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for (key, label) in MODEL_NAMES {
            registry.models.insert((*key).to_string(), (*label).to_string());
        }
        for (key, label) in HARNESS_NAMES {
            registry
                .harnesses
                .insert((*key).to_string(), (*label).to_string());
        }
        registry
    }

    pub fn display_model(&self, experiment: &str) -> String {
        self.models
            .get(experiment)
            .cloned()
            .unwrap_or_else(|| experiment.to_string())
    }

    pub fn harness_label(&self, agent: &str) -> String {
        self.harnesses
            .get(agent)
            .cloned()
            .unwrap_or_else(|| agent.to_string())
    }

    /// Merge a TOML overlay file (`[models]` / `[harnesses]` tables) on top
    /// of the current tables. Overlay entries win on key collision.
    pub fn load_overlay(&mut self, path: &Path) -> Result<()> {
        #[derive(Deserialize, Default)]
        struct Overlay {
            #[serde(default)]
            models: HashMap<String, String>,
            #[serde(default)]
            harnesses: HashMap<String, String>,
        }
        let raw = fs::read_to_string(path)?;
        let overlay: Overlay = toml::from_str(&raw)?;
        self.models.extend(overlay.models);
        self.harnesses.extend(overlay.harnesses);
        Ok(())
    }
}

/// Per-experiment configuration, one TOML file per experiment name.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub agent: Option<String>,
}

impl ExperimentConfig {
    /// Load `<config_dir>/<experiment>.toml`. Returns `None` when the file
    /// is missing or unparsable; result sets recorded before config files
    /// existed have no entry here.
    pub fn load(config_dir: &Path, experiment: &str) -> Option<Self> {
        let path = config_dir.join(format!("{experiment}.toml"));
        let raw = fs::read_to_string(path).ok()?;
        toml::from_str(&raw).ok()
    }
}

/// Resolve the harness display label for an experiment from its config.
pub fn harness_for(config_dir: &Path, experiment: &str, registry: &NameRegistry) -> String {
    match ExperimentConfig::load(config_dir, experiment).and_then(|cfg| cfg.agent) {
        Some(agent) => registry.harness_label(&agent),
        None => UNKNOWN_HARNESS.to_string(),
    }
}
