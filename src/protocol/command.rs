#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Extract,
    Pack,
    Stats,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "extract" => Command::Extract,
            "pack" => Command::Pack,
            "stats" => Command::Stats,
            _ => Command::Unknown,
        }
    }
}
