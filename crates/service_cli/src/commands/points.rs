//! Points command implementation
//!
//! Prints the first `count` normalised Sobol points, optionally starting
//! after a skip.

use serde::Serialize;
use sobol_kernel::sobol::{LowDiscrepancySequence, SobolSequence2D};
use sobol_kernel::MAX_SAMPLE_SIZE;

use crate::config::OutputFormat;
use crate::{CliError, Result};

#[derive(Debug, Serialize, PartialEq)]
struct Point {
    index: usize,
    x: f64,
    y: f64,
}

/// Run the points command
pub fn run(count: usize, skip: usize, format: OutputFormat) -> Result<()> {
    let points = collect_points(count, skip)?;

    match format {
        OutputFormat::Table => {
            for p in &points {
                println!("{:>10}  {:.10}  {:.10}", p.index, p.x, p.y);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&points)?),
    }

    Ok(())
}

fn collect_points(count: usize, skip: usize) -> Result<Vec<Point>> {
    let end = skip
        .checked_add(count)
        .filter(|&end| end as u64 <= MAX_SAMPLE_SIZE)
        .ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "skip + count must not exceed {} points",
                MAX_SAMPLE_SIZE
            ))
        })?;

    let mut sequence = SobolSequence2D::new(end);
    sequence.skip_ahead(skip);

    Ok(sequence
        .enumerate()
        .map(|(offset, (x, y))| Point {
            index: skip + offset,
            x,
            y,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_first_points() {
        let points = collect_points(3, 0).unwrap();
        assert_eq!(
            points,
            vec![
                Point { index: 0, x: 0.0, y: 0.0 },
                Point { index: 1, x: 0.5, y: 0.5 },
                Point { index: 2, x: 0.75, y: 0.25 },
            ]
        );
    }

    #[test]
    fn test_collect_with_skip() {
        let points = collect_points(2, 4).unwrap();
        assert_eq!(points[0], Point { index: 4, x: 0.375, y: 0.375 });
        assert_eq!(points[1], Point { index: 5, x: 0.875, y: 0.875 });
    }

    #[test]
    fn test_far_skip_is_direct() {
        let points = collect_points(2, 4_294_967_000).unwrap();
        assert_eq!(
            points,
            vec![
                Point { index: 4_294_967_000, x: 0.17773437523283064, y: 0.39257812476716936 },
                Point { index: 4_294_967_001, x: 0.6777343752328306, y: 0.8925781247671694 },
            ]
        );
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(matches!(
            collect_points(usize::MAX, 1),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
