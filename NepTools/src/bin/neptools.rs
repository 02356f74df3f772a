fn main() -> anyhow::Result<()> {
    neptools::cli::run_cli()
}
