use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

/// Time an arbitrary operation.
pub fn timeit<T>(run: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let t = run();
    (t, start.elapsed())
}

/// Time a fallible operation. The duration is only returned on success.
pub fn timeitr<T, E>(
    run: impl FnOnce() -> Result<T, E>,
) -> Result<(T, Duration), E> {
    let (result, time) = timeit(run);
    Ok((result?, time))
}

/// An aligned two column table of labels and values.
///
/// Values are rendered with their `Debug` impl when added, so durations show
/// up with their units and counts as plain integers.
#[derive(Debug, Default)]
pub struct Table {
    rows: Vec<(String, String)>,
}

impl Table {
    pub fn empty() -> Table {
        Table::default()
    }

    pub fn add<D: std::fmt::Debug>(&mut self, label: &str, value: D) {
        self.rows.push((label.to_string(), format!("{:?}", value)));
    }

    /// Write the table with labels right aligned on their colons.
    pub fn print<W: io::Write>(&self, wtr: W) -> io::Result<()> {
        let mut wtr = tabwriter::TabWriter::new(wtr)
            .alignment(tabwriter::Alignment::Right);
        for (label, value) in self.rows.iter() {
            writeln!(wtr, "{}:\t{}", label, value)?;
        }
        wtr.flush()
    }
}
