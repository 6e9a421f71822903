//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use console::{Style, Term};
use serde::Serialize;
use streamsx_types::{BuildRecord, BuildStatus, InstanceStatus, JobSubmission, JsonObject};
use std::io;

/// Result of one command, rendered as a table or as JSON
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    Status(InstanceStatus),
    Build(BuildRecord),
    BuildOutput(JsonObject),
    Job(JobSubmission),
}

/// Output renderer for CLI results
pub struct OutputRenderer {
    json_output: bool,
    colors: bool,
}

impl OutputRenderer {
    pub fn new(json_output: bool) -> Self {
        Self {
            json_output,
            colors: Term::stdout().features().colors_supported(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        match result {
            OperationResult::Status(status) => self.render_status(status),
            OperationResult::Build(record) => self.render_build(record),
            OperationResult::BuildOutput(output) => {
                let json = serde_json::to_string_pretty(output).map_err(io::Error::other)?;
                println!("{json}");
            }
            OperationResult::Job(job) => {
                println!("{} job {}", self.ok_marker(), job.job_id);
            }
        }
        Ok(())
    }

    fn render_status(&self, status: &InstanceStatus) {
        let running = if status.is_running() {
            self.style(Style::new().green()).apply_to("running")
        } else {
            self.style(Style::new().yellow()).apply_to("not running")
        };
        println!("Instance: {running}");
        println!(
            "Enabled:  {}",
            status.enabled.map_or("unknown", |e| if e { "yes" } else { "no" })
        );
        println!("Status:   {}", status.status.as_deref().unwrap_or("unknown"));
    }

    fn render_build(&self, record: &BuildRecord) {
        let status_style = match record.status {
            BuildStatus::Built => Style::new().green(),
            BuildStatus::Failed => Style::new().red(),
            BuildStatus::Submitted | BuildStatus::Building => Style::new().yellow(),
        };
        println!("Build:  {}", record.id);
        println!(
            "Status: {}",
            self.style(status_style).apply_to(record.status)
        );

        if record.outputs.is_empty() {
            return;
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Output").add_attribute(Attribute::Bold),
                Cell::new("Kind").add_attribute(Attribute::Bold),
            ]);
        for output in &record.outputs {
            table.add_row(vec![
                Cell::new(&output.id),
                Cell::new(output.kind.as_deref().unwrap_or("-")),
            ]);
        }
        println!();
        println!("{table}");
    }

    fn ok_marker(&self) -> console::StyledObject<&'static str> {
        self.style(Style::new().green().bold()).apply_to("Submitted")
    }

    fn style(&self, style: Style) -> Style {
        if self.colors {
            style
        } else {
            Style::new()
        }
    }
}
