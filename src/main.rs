fn main() -> anyhow::Result<()> {
    fruit_carousel::showcase::run()
}
