fn main() -> anyhow::Result<()> {
    leaderboard_data::cli::run_build_meta()
}
