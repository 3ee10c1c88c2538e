fn main() -> anyhow::Result<()> {
    farmstead::run()
}
