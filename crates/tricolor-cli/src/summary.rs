use std::path::{Path, PathBuf};

use console::Style;
use tricolor_core::channel::Band;
use tricolor_core::pipeline::config::CompositeConfig;
use tricolor_core::pipeline::CompositeReport;

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

pub fn print_compose_summary(object: &str, paths: &[PathBuf; 3], config: &CompositeConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Tricolor Composite"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(18)));
    println!();

    println!("  {:<14}{}", s.label.apply_to("Object"), s.value.apply_to(object));
    for band in Band::ALL {
        println!(
            "  {:<14}{}",
            s.label.apply_to(band),
            s.path.apply_to(paths[band.index()].display())
        );
    }
    println!();

    // Scaling
    println!("  {}", s.header.apply_to("Scaling"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Saturation"),
        s.value.apply_to(format!(
            "{} (white point {:.2}x peak)",
            config.sat_factor,
            config.sat_coeff()
        ))
    );
    if config.no_sat_clip {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Clipping"),
            s.disabled.apply_to("disabled")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Clipping"),
            s.value.apply_to(format!(">= {}", config.saturation_threshold))
        );
    }
    println!();

    // Noise
    println!("  {}", s.header.apply_to("Noise"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Level"),
        s.value.apply_to(config.noise_level)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Background"),
        s.value.apply_to(config.bg_level)
    );
    println!();

    // Alignment
    let alignment = &config.alignment;
    if alignment.enabled {
        println!("  {}", s.header.apply_to("Alignment"));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Reference"),
            s.value.apply_to(alignment.reference)
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Method"),
            s.method.apply_to(alignment.refinement)
        );
        if alignment.window {
            println!(
                "    {:<12}{}",
                s.label.apply_to("Window"),
                s.method.apply_to("Hann")
            );
        }
    } else {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Alignment"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();
}

pub fn print_report(report: &CompositeReport) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Channels"));
    for band in Band::ALL {
        let scale = report.scale(band);
        println!(
            "    {:<8}{} {}  {} {}  {} {}",
            s.label.apply_to(band),
            s.label.apply_to("peak"),
            s.value.apply_to(format!("{:.1}", report.peak(band))),
            s.label.apply_to("black"),
            s.value.apply_to(format!("{:.1}", scale.scale_min.unwrap_or_default())),
            s.label.apply_to("white"),
            s.value.apply_to(format!("{:.1}", scale.scale_max.unwrap_or_default())),
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Offsets"));
    for band in Band::ALL {
        match report.alignment(band) {
            Some(alignment) => {
                let c = &alignment.correlation;
                let quality = if c.reliable {
                    s.method.apply_to(format!("peak {:.3}", c.peak_value))
                } else {
                    s.disabled.apply_to(format!("peak {:.3}, weak", c.peak_value))
                };
                println!(
                    "    {:<8}{} ({})",
                    s.label.apply_to(band),
                    s.value.apply_to(format!(
                        "dy {:+.2}  dx {:+.2}",
                        c.offset.dy, c.offset.dx
                    )),
                    quality
                );
            }
            None => println!(
                "    {:<8}{}",
                s.label.apply_to(band),
                s.disabled.apply_to("unshifted")
            ),
        }
    }
    println!();

    println!(
        "  {:<14}{}",
        s.header.apply_to("Noise"),
        s.value.apply_to(format!("{} pixels zeroed", report.zeroed_pixels))
    );
    println!();
}

pub fn print_outputs(paths: &[&Path]) {
    let s = Styles::new();
    for path in paths {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Saved"),
            s.path.apply_to(path.display())
        );
    }
}
