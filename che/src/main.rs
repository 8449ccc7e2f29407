use clap::error::ErrorKind;
use clap::Parser;

use che::cli::Args;
use che::commands::execute_command;
use che_core::che_error;
use che_messages::messages::MESSAGES;
use che_messages::msg;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            ErrorKind::InvalidSubcommand | ErrorKind::UnknownArgument => {
                che_error!("{}", MESSAGES.common_invalid_command);
                std::process::exit(1);
            }
            _ => {
                che_error!("{}", MESSAGES.common_usage);
                std::process::exit(1);
            }
        },
    };

    che_core::logging::init_subscriber(args.verbose);

    if let Err(e) = execute_command(args).await {
        che_error!("{}", msg!(MESSAGES.common_error, error = e.to_string()));
        std::process::exit(1);
    }
}
