use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use otp_entry::app::{OtpController, RecordingHost, SimulatedVerifier};
use otp_entry::config::OtpConfig;
use otp_entry::input::{InputEvent, InputRouter};
use otp_entry::ui::{ViewModel, WidgetLayout, WidgetRenderer};

const DEFAULT_SCRIPT: &str = "123 sel:2,2 bs tap:2 3456 wait:1500 wait:800 wait:100";

/// One step of a demo script
#[derive(Debug)]
enum Step {
    Input(InputEvent),
    Wait(Duration),
}

/// Replays a scripted input sequence against the OTP entry widget
#[derive(Parser, Debug)]
#[command(name = "otp-demo")]
#[command(about = "Drive the OTP entry widget from a script of input steps", long_about = None)]
struct Cli {
    /// Widget configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the final widget frame to this PNG file
    #[arg(long)]
    png: Option<PathBuf>,

    /// Script steps: digits, `bs`, `row`, `submit`, `sel:A,B`, `tap:N`, `wait:MS`
    #[arg(trailing_var_arg = true)]
    script: Vec<String>,
}

impl Cli {
    fn steps(&self) -> Vec<String> {
        if self.script.is_empty() {
            DEFAULT_SCRIPT.split_whitespace().map(String::from).collect()
        } else {
            self.script
                .iter()
                .flat_map(|word| word.split_whitespace())
                .map(String::from)
                .collect()
        }
    }
}

fn parse_step(token: &str, layout: &WidgetLayout) -> Result<Vec<Step>, String> {
    let number = |text: &str| text.parse::<i64>().map_err(|_| format!("bad number in '{token}'"));

    let steps = match token.split_once(':') {
        Some(("wait", ms)) => vec![Step::Wait(Duration::from_millis(number(ms)?.max(0) as u64))],
        Some(("sel", range)) => {
            let (start, end) = range
                .split_once(',')
                .ok_or_else(|| format!("'{token}' needs start,end"))?;
            vec![Step::Input(InputEvent::SelectionChange {
                start: number(start)?,
                end: number(end)?,
            })]
        }
        Some(("tap", index)) => {
            let index = number(index)? as usize;
            let rect = layout
                .box_rect(index)
                .ok_or_else(|| format!("no box {index}"))?;
            let (x, y) = rect.center();
            vec![Step::Input(InputEvent::Tap {
                x: x as i32,
                y: y as i32,
            })]
        }
        Some(_) => return Err(format!("unknown step '{token}'")),
        None => match token {
            "bs" => vec![Step::Input(InputEvent::Backspace)],
            "row" => vec![Step::Input(InputEvent::Tap {
                x: layout.row.x,
                y: layout.row.y,
            })],
            "submit" => {
                let (x, y) = layout.status.center();
                vec![Step::Input(InputEvent::Tap {
                    x: x as i32,
                    y: y as i32,
                })]
            }
            text => text
                .chars()
                .map(|ch| Step::Input(InputEvent::Text(ch.to_string())))
                .collect(),
        },
    };
    Ok(steps)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "otp_entry=debug,otp_demo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Cli::parse();
    let config = match &args.config {
        Some(path) => OtpConfig::load(path)?,
        None => OtpConfig::default(),
    };

    let layout = WidgetLayout::from_config(&config);
    let renderer = WidgetRenderer::from_font_path(config.font_path.as_deref())?;
    let router = InputRouter::new(layout.clone());
    let verifier = SimulatedVerifier::rejecting(config.rejected_codes.clone());
    let mut controller = OtpController::new(config, RecordingHost::new(), verifier);
    controller.mount();

    for token in args.steps() {
        for step in parse_step(&token, &layout)? {
            match step {
                Step::Input(event) => {
                    if let Err(err) = router.dispatch(&mut controller, event) {
                        tracing::warn!("input rejected: {err}");
                    }
                }
                Step::Wait(by) => controller.advance(by),
            }
        }
        let snapshot = serde_json::to_string(&controller.snapshot())?;
        tracing::info!(step = %token, "{snapshot}");
    }

    for notification in controller.host().notifications() {
        tracing::info!(kind = ?notification.kind, "{}: {}", notification.title, notification.message);
    }

    if let Some(path) = &args.png {
        let pixmap = renderer.render(&layout, &ViewModel::from_controller(&controller))?;
        renderer.save_png(&pixmap, path)?;
        tracing::info!(path = %path.display(), "widget rendered");
    }

    controller.unmount();
    Ok(())
}
