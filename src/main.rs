fn main() -> Result<(), Box<dyn std::error::Error>> {
    sfx_memory::runtime::run()
}
