fn main() -> anyhow::Result<()> {
    rpvlab::run()
}
