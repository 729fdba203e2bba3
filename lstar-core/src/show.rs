use itertools::Itertools;

/// This method should display the time in a sensible format. If it is less than a second, it should
/// only display the milliseconds and microseconds. If it is less than a minute, it should display
/// the seconds and milliseconds. If it is less than an hour, it should display the minutes and
/// seconds. Anything longer is displayed in hours and minutes.
pub fn show_duration(duration: std::time::Duration) -> String {
    let ms = duration.as_millis();
    let us = duration.as_micros();
    let s = duration.as_secs();
    let m = s / 60;
    let h = m / 60;

    if h > 0 {
        format!("{}h {}m", h, m % 60)
    } else if m > 0 {
        format!("{}m {}s", m, s % 60)
    } else if s > 0 {
        format!("{}s {}ms", s, ms % 1000)
    } else if ms > 0 {
        format!("{}ms {}us", ms, us % 1000)
    } else {
        format!("{}us", us)
    }
}

/// Helper trait which can be used to display symbols and words.
pub trait Show {
    /// Returns a human readable representation of `self`. This is mainly used for logging
    /// and for rendering observation tables.
    fn show(&self) -> String;

    /// Shows a sequence of values, which is how a word over `Self` gets rendered. By default
    /// the individual values are separated by a single space.
    fn show_sequence<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        iter.into_iter().map(|x| x.show()).join(" ")
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }

    fn show_sequence<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        iter.into_iter().collect()
    }
}

impl Show for &str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

macro_rules! impl_show_for_integers {
    ($($ty:ty),*) => {
        $(
            impl Show for $ty {
                fn show(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_show_for_integers!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
