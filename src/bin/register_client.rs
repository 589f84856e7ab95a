use clap::Parser;
use signup_service::client::{
    FormFields, FormPhase, FormView, HttpRegistrationApi, Notice, RegistrationForm, SubmitControl,
};

#[derive(Parser)]
#[command(name = "register-client")]
#[command(about = "Submit a registration to a signup-service instance", long_about = None)]
struct Cli {
    /// Base URL of the server
    #[arg(long, env = "REGISTER_SERVER", default_value = "http://localhost:3000")]
    server: String,

    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, env = "REGISTER_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Prints the form's state changes to the terminal.
struct TerminalView;

impl FormView for TerminalView {
    fn render(&mut self, phase: FormPhase, control: &SubmitControl, notice: Option<&Notice>) {
        match (phase, notice) {
            (FormPhase::Submitting, _) => println!("{}", control.label),
            (FormPhase::Success, Some(n)) => println!("{}", n.text()),
            (FormPhase::Failed, Some(n)) => eprintln!("error: {}", n.text()),
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "signup_service=debug" } else { "signup_service=warn" };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut form = RegistrationForm::new(HttpRegistrationApi::new(cli.server), TerminalView);
    *form.fields_mut() = FormFields {
        name: cli.name,
        email: cli.email,
        password: cli.password,
    };

    if form.submit().await != FormPhase::Success {
        std::process::exit(1);
    }
}
