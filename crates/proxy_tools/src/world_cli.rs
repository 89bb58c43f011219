#![forbid(unsafe_code)]

use std::io::{BufRead, Write};
use std::path::Path;

use proxy_kernel_contracts::access::{CallerId, OperationId};
use proxy_kernel_contracts::calls::WorldCall;
use proxy_kernel_contracts::schema::WorldSchema;
use proxy_os::access_gate::CapabilityResolver;
use proxy_os::config::WorldConfig;
use proxy_os::World;
use serde::{Deserialize, Serialize};

pub const USAGE: &str =
    "usage: proxy_world <schema <config.toml> | replay <config.toml> <calls.jsonl>>";

/// One line of a replay file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayLine {
    pub caller: CallerId,
    pub call: WorldCall,
}

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayResult {
    pub line: usize,
    pub status: ReplayStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<OperationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayStatus {
    Applied,
    Rejected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
}

pub fn load_config(path: &Path) -> Result<WorldConfig, String> {
    WorldConfig::from_path(path).map_err(|e| e.to_string())
}

pub fn render_schema(schema: &WorldSchema) -> String {
    let mut out = format!("namespace {}\n", schema.namespace);
    for t in &schema.tables {
        let fields: Vec<String> = t
            .fields
            .iter()
            .map(|f| format!("{}:{}", f.name, f.ty.as_str()))
            .collect();
        out.push_str(&format!(
            "table {} key=[{}] fields=[{}]\n",
            t.name,
            t.key.join(","),
            fields.join(", ")
        ));
    }
    out.push_str(&format!("fingerprint {}", schema.fingerprint()));
    out
}

/// Applies every line of `input` in order and writes one JSON result per non-blank line.
/// Bad lines are reported as rejected and do not stop the replay; only I/O failures do.
pub fn replay<R: CapabilityResolver>(
    world: &World<R>,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<ReplaySummary, String> {
    let mut summary = ReplaySummary::default();
    for (i, line) in input.lines().enumerate() {
        let line = line.map_err(|e| format!("failed to read replay input: {e}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let result = replay_one(world, i + 1, &line);
        match result.status {
            ReplayStatus::Applied => summary.applied += 1,
            ReplayStatus::Rejected => summary.rejected += 1,
        }
        let rendered = serde_json::to_string(&result).map_err(|e| e.to_string())?;
        writeln!(out, "{rendered}").map_err(|e| format!("failed to write replay output: {e}"))?;
    }
    tracing::info!(
        applied = summary.applied,
        rejected = summary.rejected,
        "replay finished"
    );
    Ok(summary)
}

fn replay_one<R: CapabilityResolver>(world: &World<R>, line_no: usize, line: &str) -> ReplayResult {
    let parsed: ReplayLine = match serde_json::from_str(line) {
        Ok(parsed) => parsed,
        Err(e) => {
            return ReplayResult {
                line: line_no,
                status: ReplayStatus::Rejected,
                operation: None,
                trace_index: None,
                reason_code: None,
                error: Some(format!("malformed line: {e}")),
            }
        }
    };
    match world.execute(&parsed.caller, &parsed.call) {
        Ok(receipt) => ReplayResult {
            line: line_no,
            status: ReplayStatus::Applied,
            operation: Some(receipt.operation),
            trace_index: receipt.trace_index,
            reason_code: None,
            error: None,
        },
        Err(err) => ReplayResult {
            line: line_no,
            status: ReplayStatus::Rejected,
            operation: Some(parsed.call.operation()),
            trace_index: None,
            reason_code: Some(err.reason_code().0),
            error: Some(err.to_string()),
        },
    }
}

pub fn execute_world_command(args: &[String]) -> Result<String, String> {
    let subcommand = args.first().ok_or_else(|| USAGE.to_string())?;
    match subcommand.as_str() {
        "schema" => {
            let config = args.get(1).ok_or_else(|| USAGE.to_string())?;
            let config = load_config(Path::new(config))?;
            Ok(render_schema(&config.schema))
        }
        "replay" => {
            let (config, calls) = match (args.get(1), args.get(2)) {
                (Some(config), Some(calls)) => (config, calls),
                _ => return Err(USAGE.to_string()),
            };
            let config = load_config(Path::new(config))?;
            let world = World::from_config(&config).map_err(|e| e.to_string())?;
            let file = std::fs::File::open(calls)
                .map_err(|e| format!("failed to open {calls}: {e}"))?;
            let mut out = Vec::new();
            replay(&world, std::io::BufReader::new(file), &mut out)?;
            String::from_utf8(out)
                .map(|s| s.trim_end().to_string())
                .map_err(|e| e.to_string())
        }
        other => Err(format!(
            "unknown subcommand: {other}. expected one of: schema, replay"
        )),
    }
}
