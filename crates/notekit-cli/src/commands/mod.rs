use notekit::{IndexReport, StubReport};
use serde::Serialize;

use crate::error::ExitStatus;

pub mod index;
pub mod stubs;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResult {
    StubsGenerated {
        report: StubReport,
    },
    IndexBuilt {
        report: IndexReport,
        #[serde(skip)]
        quiet: bool,
    },
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            CommandResult::StubsGenerated { report } => {
                if report.skipped.is_empty() {
                    ExitStatus::Ok
                } else {
                    ExitStatus::Data
                }
            }
            CommandResult::IndexBuilt { .. } => ExitStatus::Ok,
        }
    }
}
