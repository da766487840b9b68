//! Figures must not accumulate in pyplot across runs, whatever the
//! outcome.  Kept alone in its own test binary: pyplot's figure list is
//! process wide.

use std::fs;
use perfplot::{plot, plot_results, Outcome};

#[test]
fn figures_are_released() -> Result<(), plot::Error> {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("bench.csv");
    fs::write(&source, "\
Method,NumThreads,TimeMs
Sequential,1,100
Parallel,1,90
Parallel,2,60
ParallelStream,AUTO,50
").unwrap();
    let baseline = plot::open_figures()?.len();

    for _ in 0 .. 3 {
        let output = dir.path().join("chart.png");
        assert!(matches!(plot_results(&source, &output), Outcome::Saved(_)));
        assert_eq!(plot::open_figures()?.len(), baseline);
    }

    // Fails in savefig, after the figure was created.
    let output = dir.path().join("no_dir").join("chart.png");
    assert!(matches!(plot_results(&source, &output), Outcome::Failed { .. }));
    assert_eq!(plot::open_figures()?.len(), baseline);

    {
        let _fig = plot::figure()?;
        assert_eq!(plot::open_figures()?.len(), baseline + 1);
    }
    assert_eq!(plot::open_figures()?.len(), baseline);
    Ok(())
}
