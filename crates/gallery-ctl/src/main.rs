use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "gallery-ctl",
    about = "Send interaction commands to the event gallery control socket"
)]
struct Args {
    /// Event gallery control socket.
    #[arg(long, default_value = "/run/event-gallery/control.sock")]
    control_socket: PathBuf,

    /// Logging level (error|warn|info|debug|trace).
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KeyArg {
    ArrowLeft,
    ArrowRight,
    Escape,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionArg {
    Prev,
    Next,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pointer entered the carousel (pauses autoscroll).
    PointerEnter,
    /// Pointer left the carousel.
    PointerLeave,
    TouchStart,
    /// Manual scroll of the container to OFFSET pixels.
    Scrolled { offset: f64 },
    /// Click the card at display INDEX.
    Click { index: usize },
    Key {
        #[arg(value_enum)]
        key: KeyArg,
    },
    /// Carousel prev/next buttons.
    Navigate {
        #[arg(value_enum)]
        direction: DirectionArg,
    },
    /// Overlay prev/next buttons.
    OverlayNavigate {
        #[arg(value_enum)]
        direction: DirectionArg,
    },
    /// Close the detail overlay.
    Close,
    /// Send an inquiry for the selected project.
    Inquire,
    /// Viewport resized to WIDTH pixels.
    Resized { width: f64 },
}

impl KeyArg {
    fn wire(self) -> &'static str {
        match self {
            KeyArg::ArrowLeft => "arrow-left",
            KeyArg::ArrowRight => "arrow-right",
            KeyArg::Escape => "escape",
        }
    }
}

impl DirectionArg {
    fn wire(self) -> &'static str {
        match self {
            DirectionArg::Prev => "prev",
            DirectionArg::Next => "next",
        }
    }
}

impl Command {
    fn to_json(&self) -> Value {
        match self {
            Command::PointerEnter => json!({ "command": "pointer-enter" }),
            Command::PointerLeave => json!({ "command": "pointer-leave" }),
            Command::TouchStart => json!({ "command": "touch-start" }),
            Command::Scrolled { offset } => json!({ "command": "scrolled", "offset": offset }),
            Command::Click { index } => json!({ "command": "click", "index": index }),
            Command::Key { key } => json!({ "command": "key", "key": key.wire() }),
            Command::Navigate { direction } => {
                json!({ "command": "navigate", "direction": direction.wire() })
            }
            Command::OverlayNavigate { direction } => {
                json!({ "command": "overlay-navigate", "direction": direction.wire() })
            }
            Command::Close => json!({ "command": "close" }),
            Command::Inquire => json!({ "command": "inquire" }),
            Command::Resized { width } => json!({ "command": "resized", "width": width }),
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = EnvFilter::builder()
        .parse(level)
        .with_context(|| format!("invalid log level '{level}'"))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let payload = serde_json::to_vec(&args.command.to_json())?;
    let mut stream = UnixStream::connect(&args.control_socket).with_context(|| {
        format!(
            "failed to connect to control socket at {}",
            args.control_socket.display()
        )
    })?;
    stream
        .write_all(&payload)
        .context("failed to send control command")?;
    debug!(command = ?args.command, "control command sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_to_kebab_case_tags() {
        let click = Command::Click { index: 14 }.to_json();
        assert_eq!(click, json!({ "command": "click", "index": 14 }));

        let nav = Command::OverlayNavigate {
            direction: DirectionArg::Prev,
        }
        .to_json();
        assert_eq!(
            nav,
            json!({ "command": "overlay-navigate", "direction": "prev" })
        );

        let key = Command::Key {
            key: KeyArg::ArrowRight,
        }
        .to_json();
        assert_eq!(key["key"], "arrow-right");
    }

    #[test]
    fn parses_subcommand_arguments() {
        let args = Args::try_parse_from(["gallery-ctl", "key", "escape"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Key {
                key: KeyArg::Escape
            }
        ));
        assert_eq!(
            args.control_socket,
            PathBuf::from("/run/event-gallery/control.sock")
        );
    }

    #[test]
    fn every_command_parses_as_a_daemon_interaction() {
        use event_gallery::events::{Direction, Interaction, Key};

        let cases = [
            (Command::PointerEnter, Interaction::PointerEnter),
            (Command::PointerLeave, Interaction::PointerLeave),
            (Command::TouchStart, Interaction::TouchStart),
            (
                Command::Scrolled { offset: 120.5 },
                Interaction::Scrolled { offset: 120.5 },
            ),
            (Command::Click { index: 3 }, Interaction::Click { index: 3 }),
            (
                Command::Key {
                    key: KeyArg::ArrowLeft,
                },
                Interaction::Key {
                    key: Key::ArrowLeft,
                },
            ),
            (
                Command::Key {
                    key: KeyArg::ArrowRight,
                },
                Interaction::Key {
                    key: Key::ArrowRight,
                },
            ),
            (
                Command::Key {
                    key: KeyArg::Escape,
                },
                Interaction::Key { key: Key::Escape },
            ),
            (
                Command::Navigate {
                    direction: DirectionArg::Prev,
                },
                Interaction::Navigate {
                    direction: Direction::Prev,
                },
            ),
            (
                Command::OverlayNavigate {
                    direction: DirectionArg::Next,
                },
                Interaction::OverlayNavigate {
                    direction: Direction::Next,
                },
            ),
            (Command::Close, Interaction::Close),
            (Command::Inquire, Interaction::Inquire),
            (
                Command::Resized { width: 390.0 },
                Interaction::Resized { width: 390.0 },
            ),
        ];
        for (command, expected) in cases {
            let parsed: Interaction = serde_json::from_value(command.to_json())
                .unwrap_or_else(|err| panic!("{command:?} rejected by the daemon: {err}"));
            assert_eq!(parsed, expected);
        }
    }
}
