use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    leaderboard_data::cli::run()
}
