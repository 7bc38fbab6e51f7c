//! Interface de terminal do edugen — spinner e saída colorida.
//!
//! Usa `indicatif` para o spinner de progresso e `console` para
//! estilização com cores.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::WorkflowError;
use crate::model::{Content, Mcq};
use crate::orchestrator::{InvocationReport, Outcome, ProgressSink};
use crate::workflow::Node;

/// Indicador visual de progresso de uma invocação no terminal.
pub struct WorkflowProgress {
    pb: ProgressBar,
    yellow: Style,
}

impl WorkflowProgress {
    pub fn start(grade: u8, topic: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Grade {grade}: {topic}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            yellow: Style::new().yellow().bold(),
        }
    }
}

/// Linha de status final, escrita em stderr para não poluir stdout.
fn status_line(outcome: Outcome, retry_count: u32) -> String {
    match outcome {
        Outcome::Passed => format!(
            "  {} Content passed review (retries: {retry_count})",
            Style::new().green().bold().apply_to("✓")
        ),
        Outcome::FailedReview => format!(
            "  {} Content generated but did not fully pass review.",
            Style::new().yellow().bold().apply_to("!")
        ),
    }
}

impl ProgressSink for WorkflowProgress {
    fn on_node(&self, node: Node, retry_count: u32) {
        let msg = match (node, retry_count) {
            (Node::Generator, 0) => "Generating content...".to_string(),
            (Node::Generator, n) => format!("Retry {n}: regenerating content..."),
            (Node::Reviewer, _) => "Reviewing content...".to_string(),
            (Node::End, _) => "Done".to_string(),
        };
        if node == Node::Generator && retry_count > 0 {
            self.pb.println(format!(
                "  {} Review failed, retrying once",
                self.yellow.apply_to("↻")
            ));
        }
        self.pb.set_message(msg);
    }

    fn on_complete(&self, outcome: Outcome, retry_count: u32) {
        self.pb.finish_and_clear();
        eprintln!("{}", status_line(outcome, retry_count));
    }

    fn on_error(&self, _error: &WorkflowError) {
        self.pb.finish_and_clear();
    }
}

/// Formata o conteúdo final: explicação seguida das questões numeradas.
pub fn render_content(content: &Content) -> String {
    let bold = Style::new().bold();
    let mut out = String::new();
    out.push_str(&format!("{}\n", bold.apply_to("Explanation")));
    out.push_str(content.explanation.trim());
    out.push_str("\n\n");
    out.push_str(&format!("{}\n", bold.apply_to("MCQs")));
    for (i, mcq) in content.mcqs.iter().enumerate() {
        render_mcq(&mut out, i + 1, mcq);
    }
    out
}

fn render_mcq(out: &mut String, number: usize, mcq: &Mcq) {
    out.push_str(&format!("\nQuestion {number}\n"));
    out.push_str(&format!("{}\n", mcq.question));
    for opt in &mcq.options {
        out.push_str(&format!("  - {opt}\n"));
    }
    out.push_str(&format!("Correct Answer: {}\n", mcq.answer));
}

/// Visão de inspeção: cabeçalho da invocação, saídas estruturadas,
/// contador e log de execução.
pub fn render_inspector(report: &InvocationReport) -> String {
    let heading = Style::new().cyan().bold();
    let state = &report.state;
    let mut out = String::new();

    let path: Vec<String> = report.path.iter().map(Node::to_string).collect();
    out.push_str(&format!("{}\n", heading.apply_to("─── Invocation ───")));
    out.push_str(&format!("Id: {}\n", report.id));
    out.push_str(&format!("Outcome: {}\n", outcome_label(report.outcome)));
    out.push_str(&format!("Path: {}\n", path.join(" → ")));
    out.push_str(&format!(
        "Started: {} ({} ms)\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.duration_ms
    ));

    out.push_str(&format!("{}\n", heading.apply_to("─── Generator Output ───")));
    match &state.generator_output {
        Some(content) => out.push_str(&content.to_pretty_json().unwrap_or_default()),
        None => out.push_str("No generator output."),
    }
    out.push('\n');

    out.push_str(&format!("{}\n", heading.apply_to("─── Reviewer Output ───")));
    match &state.reviewer_output {
        Some(review) => out.push_str(&serde_json::to_string_pretty(review).unwrap_or_default()),
        None => out.push_str("No reviewer output."),
    }
    out.push('\n');

    out.push_str(&format!("{}\n", heading.apply_to("─── Retry Count ───")));
    out.push_str(&format!("{}\n", state.retry_count));

    out.push_str(&format!("{}\n", heading.apply_to("─── Execution Logs ───")));
    for entry in &report.log {
        out.push_str(&format!("{entry}\n"));
    }
    out
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Passed => "passed",
        Outcome::FailedReview => "failed review",
    }
}
