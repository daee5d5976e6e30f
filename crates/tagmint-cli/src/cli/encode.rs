use tagmint::{encode_symbol, total_width};

use crate::cli::config::EncodeArgs;

/// Prints the stripe chart for a piece of text: one `#` column per
/// module of bar, one `.` per module of space, then the segment count
/// and total width. Handy for eyeballing what a label will carry
/// without firing up a printer.
pub fn run(args: &EncodeArgs) -> anyhow::Result<()> {
    let segments = encode_symbol(&args.text);
    let width = total_width(&segments);

    let mut chart = String::with_capacity(width as usize);
    for segment in &segments {
        let glyph = if segment.is_bar { '#' } else { '.' };
        for _ in 0..segment.width {
            chart.push(glyph);
        }
    }

    println!("{}", args.text);
    println!("{chart}");
    println!("{} segments, {} modules wide", segments.len(), width);
    Ok(())
}
