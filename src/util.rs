/// Device-selector string for the benchmarked kernel, built from
/// `SYCL_DEVICE_FILTER`. Only logged; selects nothing in this harness.
pub fn device_selector(is_gpu: bool) -> String {
    let filter = std::env::var("SYCL_DEVICE_FILTER").ok();
    selector_from_filter(filter.as_deref(), is_gpu)
}

fn selector_from_filter(filter: Option<&str>, is_gpu: bool) -> String {
    let device = if is_gpu { "gpu" } else { "cpu" };
    match filter {
        None | Some("opencl") => format!("opencl:{device}"),
        Some("level_zero") => format!("level_zero:{device}"),
        Some(f) => f.to_string(),
    }
}

pub fn time<T>(t: &str, f: impl FnOnce() -> T) -> T {
    eprintln!("{t}: Starting");
    let start = std::time::Instant::now();
    let r = f();
    let elapsed = start.elapsed();
    eprintln!("{t}: Elapsed: {:?}", elapsed);
    r
}
