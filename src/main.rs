/// ecosort entry point for native builds.
///
/// Wires the synthetic camera and the scripted services to a session, reads
/// one command per line from stdin and prints what the page would show.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::io::BufRead;

    use ecosort::AppConfig;

    let config = AppConfig::load_from_default_path().unwrap_or_default();

    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let mut host = host::Host::new(&config);
    host.print();

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        };

        match line.parse::<host::Command>() {
            Ok(host::Command::Quit) => break,
            Ok(command) => {
                if let Err(e) = host.run(command) {
                    eprintln!("{}", e);
                }
                host.print();
            }
            Err(host::CommandError::Empty) => {}
            Err(e) => eprintln!("{}\n{}", e, host::HELP),
        }
    }
}

// No terminal host on the web.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::path::PathBuf;
    use std::rc::Rc;
    use std::str::FromStr;
    use std::time::Duration;

    use ecosort::capture::SyntheticCamera;
    use ecosort::constants::HOST_TICK_INTERVAL_MS;
    use ecosort::intake::{DropPayload, SelectedFile};
    use ecosort::model::{CategoryKey, ParseCategoryError, Sender};
    use ecosort::services::SystemClock;
    use ecosort::views::{Region, ResultPanel};
    use ecosort::{AppConfig, Message, ViewStateController};

    pub const HELP: &str = "Commands: camera | upload <path> | drop <path> | capture | switch | \
                            new | ask <category> | say <text> | ok | quit";

    /// One line of user input.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Command {
        Camera,
        Upload(PathBuf),
        Drop(PathBuf),
        Capture,
        Switch,
        New,
        Ask(CategoryKey),
        Say(String),
        Ok,
        Quit,
    }

    #[derive(Debug, thiserror::Error)]
    pub enum CommandError {
        #[error("Empty command")]
        Empty,
        #[error("Unknown command: {0}")]
        Unknown(String),
        #[error("'{0}' needs an argument")]
        MissingArgument(&'static str),
        #[error(transparent)]
        Category(#[from] ParseCategoryError),
    }

    impl FromStr for Command {
        type Err = CommandError;

        fn from_str(line: &str) -> Result<Self, Self::Err> {
            let line = line.trim();
            let (word, rest) = match line.split_once(char::is_whitespace) {
                Some((word, rest)) => (word, rest.trim()),
                None => (line, ""),
            };

            let argument = |name: &'static str| {
                if rest.is_empty() {
                    Err(CommandError::MissingArgument(name))
                } else {
                    Ok(rest)
                }
            };

            match word.to_lowercase().as_str() {
                "" => Err(CommandError::Empty),
                "camera" => Ok(Command::Camera),
                "upload" => Ok(Command::Upload(argument("upload")?.into())),
                "drop" => Ok(Command::Drop(argument("drop")?.into())),
                "capture" => Ok(Command::Capture),
                "switch" => Ok(Command::Switch),
                "new" => Ok(Command::New),
                "ask" => Ok(Command::Ask(argument("ask")?.parse()?)),
                "say" => Ok(Command::Say(argument("say")?.to_string())),
                "ok" => Ok(Command::Ok),
                "quit" | "exit" => Ok(Command::Quit),
                other => Err(CommandError::Unknown(other.to_string())),
            }
        }
    }

    pub struct Host {
        session: ViewStateController,
    }

    impl Host {
        pub fn new(config: &AppConfig) -> Self {
            let session = ViewStateController::from_config(
                config,
                Box::new(SyntheticCamera::new()),
                Rc::new(SystemClock),
            );
            Self { session }
        }

        /// Turn a command into a message, apply it and wait for any service
        /// work it started.
        pub fn run(&mut self, command: Command) -> std::io::Result<()> {
            let message = match command {
                Command::Camera => Message::ChooseCamera,
                Command::Upload(path) => Message::FileSelected(SelectedFile::from_path(&path)?),
                Command::Drop(path) => {
                    Message::FilesDropped(DropPayload::new(vec![SelectedFile::from_path(&path)?]))
                }
                Command::Capture => Message::Capture,
                Command::Switch => Message::SwitchCamera,
                Command::New => Message::NewAnalysis,
                Command::Ask(key) => Message::AskAboutCategory(key),
                Command::Say(text) => Message::SendChat(text),
                Command::Ok => Message::DismissNotice,
                Command::Quit => return Ok(()),
            };

            let transition = self.session.update(message);
            log::debug!("{:?}", transition);

            while self.session.is_busy() {
                std::thread::sleep(Duration::from_millis(HOST_TICK_INTERVAL_MS));
                self.session.tick();
            }
            Ok(())
        }

        pub fn print(&self) {
            let model = self.session.view();

            println!();
            match model.region {
                Region::Home => println!("[Inicio] camera | upload <path>"),
                Region::Camera => {
                    if let Some(camera) = model.camera {
                        let status = if camera.live { "en vivo" } else { "sin señal" };
                        println!(
                            "[Cámara {}] {} | capture | switch | upload <path>",
                            camera.facing.constraint_name(),
                            status
                        );
                    }
                }
                Region::Upload => {
                    if let Some(upload) = model.upload {
                        match upload.preview {
                            Some((w, h)) => println!("[Subir imagen] vista previa {}x{}", w, h),
                            None => println!("[Subir imagen] upload <path> | drop <path>"),
                        }
                    }
                }
                Region::Result => match model.result {
                    Some(ResultPanel::Analyzing { label }) => println!("{}", label),
                    Some(ResultPanel::Ready(card)) => {
                        println!("{} ({})", card.name, card.key);
                        println!("  {}", card.description);
                        println!("  {} {}", card.disposal_heading, card.disposal);
                        println!("  {}: {}", card.tips_heading, card.tips);
                        println!("  ask {} -> {}", card.key, card.ask_label);
                        println!("  new");
                    }
                    None => {}
                },
            }

            for message in &model.chat {
                let who = match message.sender {
                    Sender::User => "Tú",
                    Sender::Assistant => "Asistente",
                };
                println!("  {}: {}", who, message.text);
            }

            if let Some(notice) = &model.notice {
                println!("! {} (ok)", notice.text);
            }
        }
    }

}
