use indicatif::{ProgressBar, ProgressStyle};

/// Resolution of [`fraction_bar`]
pub const FRACTION_STEPS: u64 = 1000;

pub fn progress_bar(len: u64, msg: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    {
        bar.set_style(style.progress_chars("##-"));
    }
    bar.set_message(msg.into());

    bar
}

/// A bar driven by fractions in `[0, 1]`, e.g. from the bootstrap progress hook.
pub fn fraction_bar(msg: impl Into<String>) -> ProgressBar {
    progress_bar(FRACTION_STEPS, msg)
}

/// Moves a [`fraction_bar`] to `fraction`.
pub fn set_fraction(bar: &ProgressBar, fraction: f64) {
    bar.set_position((fraction.clamp(0.0, 1.0) * FRACTION_STEPS as f64).round() as u64);
}

#[cfg(test)]
mod tests {
    use super::{fraction_bar, set_fraction, FRACTION_STEPS};

    #[test]
    fn test_set_fraction() {
        let bar = fraction_bar("Bootstrapping");

        set_fraction(&bar, 0.25);
        assert_eq!(bar.position(), 250);

        set_fraction(&bar, 1.7);
        assert_eq!(bar.position(), FRACTION_STEPS);
    }
}
