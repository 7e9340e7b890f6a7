use formpress::{FormPressError, TemplateJob};

fn main() -> Result<(), FormPressError> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let job = TemplateJob::new();
    let report = job.run()?;

    println!("Using font: {}", report.font);
    println!(
        "Generated: {} ({} pages, {} fields)",
        report.output.display(),
        report.page_count,
        report.field_count
    );
    Ok(())
}
