use std::path::Path;

use console::Style;
use holotrack_core::pipeline::{HoloConfig, PipelineOutput};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_pipeline_summary(config: &HoloConfig, frame_count: usize, output: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Holotrack Pipeline"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(18)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(frame_count)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Background"),
        s.value.apply_to(format!("{} samples", config.background_samples))
    );
    println!();

    let optics = &config.optics;
    println!("  {}", s.header.apply_to("Reconstruction"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Propagator"),
        s.method.apply_to(config.reconstruction.propagator)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Planes"),
        s.value.apply_to(format!(
            "{} x {} um",
            optics.num_steps, optics.step_size
        ))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Optics"),
        s.value.apply_to(format!(
            "n={} lambda={} um fs={} px/um",
            optics.refractive_index, optics.wavelength, optics.sampling_frequency
        ))
    );
    let rec = &config.reconstruction;
    if rec.bandpass_enabled {
        println!(
            "    {:<14}{}",
            s.label.apply_to("Bandpass"),
            s.value.apply_to(format!("{} .. {} px", rec.bandpass_small, rec.bandpass_large))
        );
    } else {
        println!(
            "    {:<14}{}",
            s.label.apply_to("Bandpass"),
            s.disabled.apply_to("disabled")
        );
    }
    if rec.pre_filter_enabled {
        println!(
            "    {:<14}{}",
            s.label.apply_to("Median"),
            s.value.apply_to(format!("{0}x{0}", rec.pre_filter_size))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Localization"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Peak spacing"),
        s.value.apply_to(format!("{} px", config.localizer.peak_min_distance))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Window"),
        s.value.apply_to(format!("+/-{} px", config.localizer.neighborhood_size))
    );
    match config.localizer.focus_threshold {
        Some(t) => println!(
            "    {:<14}{}",
            s.label.apply_to("Threshold"),
            s.value.apply_to(t)
        ),
        None => println!(
            "    {:<14}{}",
            s.label.apply_to("Threshold"),
            s.disabled.apply_to("none")
        ),
    }
    println!();

    let linker = &config.linker;
    println!("  {}", s.header.apply_to("Linking"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Radius"),
        s.value.apply_to(linker.search_radius)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Frame skip"),
        s.value.apply_to(linker.frame_skip)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Min length"),
        s.value.apply_to(linker.min_track_length)
    );
    println!();
}

pub fn print_run_result(output: &PipelineOutput, path: &Path) {
    let s = Styles::new();
    let summary = &output.summary;

    println!("  {}", s.header.apply_to("Result"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Detections"),
        s.value.apply_to(output.detection_count())
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Started"),
        s.value.apply_to(summary.tracks_started)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Accepted"),
        s.method.apply_to(summary.tracks_accepted)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Too short"),
        s.disabled.apply_to(summary.tracks_discarded)
    );
    println!();
    println!("  Tracks saved to {}", s.path.apply_to(path.display()));
}
