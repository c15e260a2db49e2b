use std::fmt;

/// Which output stream of the managed process a relay is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn label(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Role of a watch root.
///
/// The primary root is where the build runs and the artifact lives;
/// auxiliary roots only get a dependency fetch before each build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Primary,
    Auxiliary,
}

/// Per-stream relay switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaySettings {
    pub stdout: bool,
    pub stderr: bool,
}

impl RelaySettings {
    pub fn enabled(&self, stream: StreamKind) -> bool {
        match stream {
            StreamKind::Stdout => self.stdout,
            StreamKind::Stderr => self.stderr,
        }
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            stdout: true,
            stderr: true,
        }
    }
}
