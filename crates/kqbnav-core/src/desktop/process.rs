//! Process discovery via sysinfo

use sysinfo::System;
use tracing::trace;

use crate::host::{NamePattern, ProcessTable};

/// Live process table, refreshed on every query
pub struct SysinfoProcesses {
    system: System,
}

impl SysinfoProcesses {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SysinfoProcesses {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SysinfoProcesses {
    fn is_running(&mut self, pattern: &NamePattern) -> bool {
        self.system.refresh_processes();
        let running = self
            .system
            .processes()
            .values()
            .any(|process| pattern.is_match(process.name()));
        trace!(pattern = pattern.as_str(), running, "process lookup");
        running
    }
}
