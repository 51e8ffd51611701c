use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    viewbind::build!();

    Ok(())
}
