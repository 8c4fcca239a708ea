fn main() -> Result<(), Box<dyn std::error::Error>> {
    readaloud::runtime::run()
}
