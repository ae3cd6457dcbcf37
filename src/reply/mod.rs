//! Maps relay outcomes onto user-visible replies, one reply per outcome variant.

mod types;

pub use types::{Color, Reply, ReplyField};

use crate::{
    image::ImageOutcome,
    llm::{FailureKind, GenerationResult, NetworkFailure},
    relay::{Relayed, WarmupOutcome, WarmupReport},
};

const NOT_HERE: &str = "Sorry, JengGPT is not here right now! Please try again later.";

pub fn generation(relayed: &Relayed) -> Reply {
    match &relayed.result {
        GenerationResult::Success(answer) => Reply::new(
            "🧠 JengGPT",
            format!("**Prompt:** {}\n\n{}", relayed.prompt, answer),
            Color::DARK_TEAL,
        )
        .field("🤖 Model Used", relayed.model.as_str(), false)
        .footer(format!("Powered by {} via Ollama", relayed.model)),
        GenerationResult::BackendOffline => Reply::new(
            "🛑 JengGPT is not available",
            "The AI backend (Ollama) is currently offline. Try again shortly.",
            Color::RED,
        )
        .ephemeral(),
        GenerationResult::InvalidResponse => {
            Reply::new("😴 JengGPT is Not Available", NOT_HERE, Color::ORANGE)
        }
        GenerationResult::NetworkTimeout => Reply::new(
            "⏳ Timeout",
            "JengGPT took too long to respond. Try again in a moment!",
            Color::ORANGE,
        ),
        GenerationResult::NetworkError(NetworkFailure {
            kind: FailureKind::ConnectionRefused,
            ..
        }) => Reply::new("😴 JengGPT is Offline", NOT_HERE, Color::ORANGE),
        GenerationResult::NetworkError(NetworkFailure {
            kind: FailureKind::Status(_) | FailureKind::Other,
            detail,
        }) => Reply::new("❌ Error", code_block(detail), Color::RED),
    }
}

pub fn warmup(report: &WarmupReport) -> Reply {
    let model = &report.model;
    match &report.outcome {
        WarmupOutcome::AlreadyActive => Reply::new(
            "🟢 Model Already Active",
            format!("The model **`{}`** is already running and ready to use.", model),
            Color::BLURPLE,
        ),
        WarmupOutcome::Warmed(elapsed) => Reply::new(
            "✅ Warmup Complete",
            format!(
                "Model **`{}`** is now active.\nWarmup time: **{:.2} seconds**",
                model,
                elapsed.as_secs_f64()
            ),
            Color::GREEN,
        ),
        WarmupOutcome::NotResponding(status) => Reply::new(
            "❌ Ollama is not responding",
            "Ping to the AI backend failed.",
            Color::RED,
        )
        .field("Status", status.to_string(), true),
        WarmupOutcome::BackendOffline => Reply::new(
            "😴 JengGPT is Offline",
            "Warmup failed. JengGPT is not responding or offline.",
            Color::ORANGE,
        ),
        WarmupOutcome::TimedOut => Reply::new(
            "⏳ Warmup Timed Out",
            format!(
                "Model **`{}`** did not finish loading in time. Try again in a moment!",
                model
            ),
            Color::ORANGE,
        ),
        WarmupOutcome::Failed(status) => Reply::new(
            "⚠️ Warmup Failed",
            format!("Ollama responded with status code `{}`.", status),
            Color::ORANGE,
        ),
    }
}

pub fn image(prompt: &str, outcome: &ImageOutcome) -> Reply {
    match outcome {
        ImageOutcome::Generated(attachment) => Reply::new(
            "🎨 JengGPT Image",
            format!("**Prompt:** {}", prompt),
            Color::DARK_TEAL,
        )
        .attachment_image(&attachment.filename)
        .footer("Generated via txt2img"),
        ImageOutcome::Failed(detail) => {
            Reply::new("❌ Image Generation Failed", code_block(detail), Color::RED)
        }
    }
}

fn code_block(detail: &str) -> String {
    format!("```\n{}\n```", detail)
}
