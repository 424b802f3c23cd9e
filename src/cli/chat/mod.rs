pub mod command;
pub mod conversation_state;
pub mod markdown;
pub mod prompt;
pub mod surface;
pub mod terminal;
pub mod widget;

use std::io::Write;
use std::process::ExitCode;

use color_print::{cformat, cstr};
use command::Command;
use eyre::Result;
use surface::InputControl;
use terminal::{TerminalInput, TerminalSurface};
use tracing::{error, info};
use widget::{ChatWidget, SubmitOutcome};

use crate::chat_client::ChatClient;
use crate::config::ChatConfig;

const WELCOME_TEXT: &str = cstr!(
    "<bold>SafetyTrainPro Chat</bold>
<dim>Ask anything about workplace safety training.</dim>

/help         Show the help dialogue
/quit         Quit the application
"
);

const HELP_TEXT: &str = cstr!(
    "<bold>SafetyTrainPro Chat</bold>

/clear        Start over with just the greeting
/suggestions  List the suggested questions
/N            Send suggestion number N
/help         Show this help dialogue
/quit         Quit the application
"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

type TerminalWidget = ChatWidget<TerminalSurface, TerminalInput, ChatClient>;

pub struct ChatContext {
    widget: TerminalWidget,
    input: Option<String>,
}

impl ChatContext {
    pub fn new(output: Box<dyn Write>, config: ChatConfig, input: Option<String>) -> Result<Self> {
        let client = ChatClient::new(&config.endpoint)?;
        info!("Chatting with {}", client.chat_url());

        let widget = ChatWidget::new(
            TerminalSurface::new(output),
            TerminalInput::new()?,
            client,
            config.greeting,
            config.suggestions,
        );

        Ok(Self { widget, input })
    }

    pub async fn run(&mut self) -> Result<ExitCode> {
        // Single query
        if let Some(input) = self.input.take() {
            self.widget.initialize()?;
            let outcome = self.widget.submit(input.trim()).await?;
            return Ok(match outcome {
                SubmitOutcome::Failed(_) => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            });
        }

        self.widget.surface_mut().print_notice(WELCOME_TEXT)?;
        self.print_suggestions()?;
        self.widget.initialize()?;
        self.widget.input_mut().focus();

        self.run_interactive().await?;
        Ok(ExitCode::SUCCESS)
    }

    async fn run_interactive(&mut self) -> Result<()> {
        loop {
            let Some(line) = self.widget.input_mut().read_line()? else {
                break;
            };

            if self.step(&line).await == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    /// Handles one line. Errors are reported and the session goes on.
    async fn step(&mut self, line: &str) -> Flow {
        match self.handle_input(line).await {
            Ok(flow) => flow,
            Err(e) => {
                error!("Failed to handle input: {:?}", e);
                if let Err(notice_err) = self.widget.surface_mut().print_notice(&format!("Error: {}", e)) {
                    error!("Failed to report error: {}", notice_err);
                }
                Flow::Continue
            }
        }
    }

    async fn handle_input(&mut self, line: &str) -> Result<Flow> {
        match Command::parse(line) {
            Command::Quit => return Ok(Flow::Quit),
            Command::Message(text) => {
                if self.widget.submit(&text).await? == SubmitOutcome::Skipped {
                    self.widget.input_mut().clear();
                }
            }
            Command::Suggestion(number) => {
                self.widget.input_mut().clear();
                if let Err(e) = self.widget.activate_suggestion(number).await {
                    error!("Suggestion failed: {}", e);
                    self.widget.surface_mut().print_notice(&format!("Error: {}", e))?;
                }
            }
            Command::Help => {
                self.widget.input_mut().clear();
                self.widget.surface_mut().print_notice(HELP_TEXT)?;
            }
            Command::Suggestions => {
                self.widget.input_mut().clear();
                self.print_suggestions()?;
            }
            Command::Clear => {
                self.widget.input_mut().clear();
                self.widget.initialize()?;
            }
            Command::Unknown(command) => {
                self.widget.input_mut().clear();
                let notice = cformat!("<yellow>Unknown command</yellow> {}. Try /help.", command);
                self.widget.surface_mut().print_notice(&notice)?;
            }
        }

        Ok(Flow::Continue)
    }

    fn print_suggestions(&mut self) -> Result<()> {
        if self.widget.suggestions().is_empty() {
            return Ok(());
        }

        let mut text = cformat!("<bold>Things to try</bold>\n");
        for (i, suggestion) in self.widget.suggestions().iter().enumerate() {
            text.push_str(&format!("/{:<3} {}\n", i + 1, suggestion));
        }
        self.widget.surface_mut().print_notice(&text)
    }
}
