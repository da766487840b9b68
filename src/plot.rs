//! Thin binding to the [Matplotlib][] Python visualization library.
//!
//! Usage
//! -----
//!
//! The interface stays close to Matplotlib's explicit one while keeping
//! a Rust flavor: figures own their axes, plot calls are builders that
//! end with a fallible `.plot()`.  Rendering always goes through the
//! non-interactive `Agg` backend.
//!
//! [Matplotlib]: https://matplotlib.org/

use std::path::Path;
use lazy_static::lazy_static;
use ndarray::{ArrayBase, Data as ArrayData, Ix1};
use numpy::{PyArray1, ToPyArray};
use pyo3::{
    prelude::*,
    intern,
    exceptions::{PyFileNotFoundError, PyPermissionError},
    types::PyDict,
};
use thiserror::Error;

/// Possible errors of the plotting functions.
#[derive(Debug, Error)]
pub enum Error {
    /// The Python library "matplotlib" was not found.
    #[error("The matplotlib library has not been found.\n\
             Please install it.  See https://matplotlib.org/")]
    NoMatplotlib,
    /// The path contains an element that is not a directory or does
    /// not exist.
    #[error("A path contains an element that is not a directory or \
             does not exist")]
    FileNotFound,
    /// Permission denied to access or create the filesystem path.
    #[error("Permission denied to access or create the filesystem path")]
    PermissionDenied,
    /// Other Python errors.
    #[error("Python error: {0}")]
    Python(#[from] PyErr),
}

lazy_static! {
    static ref PYPLOT: Result<Py<PyModule>, PyErr> = {
        Python::with_gil(|py| -> PyResult<Py<PyModule>> {
            let mpl = PyModule::import_bound(py, intern!(py, "matplotlib"))?;
            // Must happen before pyplot is imported.
            mpl.call_method1(intern!(py, "use"), ("Agg",))?;
            let pyplot = PyModule::import_bound(
                py, intern!(py, "matplotlib.pyplot"))?;
            Ok(pyplot.unbind())
        })
    };
}

/// Return a handle to the module `$m`.
/// ⚠ This may try to lock Python's GIL.  Make sure it is executed
/// outside a call to `Python::with_gil`.
macro_rules! pymod { ($m: ident) => {
    $m.as_ref().map_err(|_| Error::NoMatplotlib)
}}

/// Call the method `$m` of the Python object `$obj`, discarding the
/// returned value.
macro_rules! meth {
    ($obj: expr, $m: ident, $args: expr) => {
        Python::with_gil(|py| {
            $obj.bind(py)
                .call_method1(intern!(py, stringify!($m)), $args)
                .map(|_| ())
                .map_err(Error::Python)
        })
    };
}

/// Data that can be handed to Matplotlib as a 1-D numpy array.
///
/// The values are copied: Matplotlib keeps references to the arrays
/// it receives until the figure is drawn, which may happen after the
/// Rust buffer is gone.
pub trait Data {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyAny>;
}

impl Data for [f64] {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyAny> {
        PyArray1::from_slice_bound(py, self).into_any()
    }
}

impl<const N: usize> Data for [f64; N] {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyAny> {
        self.as_slice().to_numpy(py)
    }
}

impl Data for Vec<f64> {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyAny> {
        self.as_slice().to_numpy(py)
    }
}

impl<S> Data for ArrayBase<S, Ix1>
where S: ArrayData<Elem = f64> {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyAny> {
        self.to_pyarray_bound(py).into_any()
    }
}

#[derive(Debug, Clone)]
pub struct Axes {
    ax: PyObject,
}

/// The top level container for all the plot elements.
///
/// A `Figure` is registered with pyplot until it is closed, either
/// explicitly with [`Figure::close`] or when it is dropped.
#[derive(Debug)]
pub struct Figure {
    fig: PyObject, // instance of matplotlib.figure.Figure
    open: bool,
}

#[inline(always)]
fn grid<const R: usize, const C: usize, U>(
    mut f: impl FnMut(usize, usize) -> U) -> [[U; C]; R] {
    let mut r = 0;
    [(); R].map(|_| {
        let mut c = 0;
        let row = [(); C].map(|_| {
            let y = f(r, c);
            c += 1;
            y });
        r += 1;
        row })
}

impl Figure {
    /// Add an `R` × `C` grid of axes to the figure.
    pub fn subplots<const R: usize, const C: usize>(
        &self) -> Result<[[Axes; C]; R], Error> {
        let cells = Python::with_gil(|py| -> Result<Vec<Axes>, Error> {
            let fig = self.fig.bind(py);
            (0 .. R * C).map(|i| {
                let ax = fig.call_method1(
                    intern!(py, "add_subplot"), (R, C, i + 1))?;
                Ok::<_, Error>(Axes { ax: ax.unbind() })
            }).collect()
        })?;
        let mut cells = cells.into_iter();
        Ok(grid(|_, _| cells.next().expect("one Axes per grid cell")))
    }

    pub fn save(&self) -> Savefig<'_> {
        Savefig { fig: self, dpi: None }
    }

    /// Release the figure from pyplot.
    pub fn close(mut self) -> Result<(), Error> {
        self.open = false;
        close_figure(&self.fig)
    }
}

impl Drop for Figure {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = close_figure(&self.fig) {
                log::warn!("failed to close figure: {e}");
            }
        }
    }
}

fn close_figure(fig: &PyObject) -> Result<(), Error> {
    let pyplot = pymod!(PYPLOT)?;
    Python::with_gil(|py| -> Result<(), Error> {
        pyplot.bind(py)
            .call_method1(intern!(py, "close"), (fig.clone_ref(py),))?;
        Ok(())
    })
}

pub struct Savefig<'a> {
    fig: &'a Figure,
    dpi: Option<f64>,
}

impl Savefig<'_> {
    pub fn dpi(&mut self, dpi: f64) -> &mut Self {
        if dpi > 0. {
            self.dpi = Some(dpi);
        } else {
            self.dpi = None;
        }
        self
    }

    /// Write the figure to `path`, replacing any existing file.  The
    /// image format follows the extension of `path`.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        Python::with_gil(|py| -> Result<(), Error> {
            let kwargs = PyDict::new_bound(py);
            if let Some(dpi) = self.dpi {
                kwargs.set_item("dpi", dpi)?;
            }
            self.fig.fig.bind(py).call_method(
                intern!(py, "savefig"), (path,), Some(&kwargs)
            ).map_err(|e| {
                if e.is_instance_of::<PyFileNotFoundError>(py) {
                    Error::FileNotFound
                } else if e.is_instance_of::<PyPermissionError>(py) {
                    Error::PermissionDenied
                } else {
                    Error::Python(e)
                }
            })?;
            Ok(())
        })?;
        log::debug!("figure written to {}", path.display());
        Ok(())
    }
}

/// Return a new pyplot figure with Matplotlib's default size.
pub fn figure() -> Result<Figure, Error> {
    new_figure(None)
}

/// Return a new pyplot figure of `width` × `height` inches.
pub fn figure_with_size(width: f64, height: f64) -> Result<Figure, Error> {
    new_figure(Some((width, height)))
}

fn new_figure(size: Option<(f64, f64)>) -> Result<Figure, Error> {
    let pyplot = pymod!(PYPLOT)?;
    Python::with_gil(|py| -> Result<Figure, Error> {
        let kwargs = PyDict::new_bound(py);
        if let Some(size) = size {
            kwargs.set_item("figsize", size)?;
        }
        let fig = pyplot.bind(py)
            .call_method(intern!(py, "figure"), (), Some(&kwargs))?;
        Ok(Figure { fig: fig.unbind(), open: true })
    })
}

pub fn subplots<const R: usize, const C: usize>(
) -> Result<(Figure, [[Axes; C]; R]), Error> {
    let fig = figure()?;
    let ax = fig.subplots()?;
    Ok((fig, ax))
}

/// Numbers of the figures pyplot currently keeps open.
pub fn open_figures() -> Result<Vec<i64>, Error> {
    let pyplot = pymod!(PYPLOT)?;
    Python::with_gil(|py| -> Result<Vec<i64>, Error> {
        let nums = pyplot.bind(py)
            .call_method0(intern!(py, "get_fignums"))?;
        Ok(nums.extract()?)
    })
}


impl Axes {
    /// Plot `y` versus `x` as lines and/or markers.
    ///
    /// # Example
    ///
    /// ```
    /// use perfplot::plot;
    /// let (fig, [[mut ax]]) = plot::subplots()?;
    /// ax.xy(&[1., 2., 3., 4.], &[1., 4., 2., 3.]).marker("o").plot()?;
    /// fig.save().to_file("target/XY_plot.png")?;
    /// # Ok::<(), perfplot::plot::Error>(())
    /// ```
    // FIXME: Do we want to check that `x` and `y` have the same
    // dimension?  Better error message?
    #[must_use]
    pub fn xy<'a, D>(&'a mut self, x: &'a D, y: &'a D) -> XY<'a, D>
    where D: Data + ?Sized {
        // Mutably borrow `self` to reflect that the final `.plot()`
        // will mutate the underlying Python object.
        XY { axes: self,
             fmt: "",
             options: PlotOptions::default(),
             x, y }
    }

    /// Draw a horizontal line across the axes at height `y`.
    ///
    /// # Example
    ///
    /// ```
    /// use perfplot::plot;
    /// let (fig, [[mut ax]]) = plot::subplots()?;
    /// ax.axhline(2.5).color("r").linestyle("--").label("limit").plot()?;
    /// fig.save().to_file("target/axhline_plot.png")?;
    /// # Ok::<(), perfplot::plot::Error>(())
    /// ```
    #[must_use]
    pub fn axhline(&mut self, y: f64) -> AxHLine<'_> {
        AxHLine { axes: self,
                  options: PlotOptions::default(),
                  y }
    }

    pub fn set_title(&mut self, v: &str) -> Result<&mut Self, Error> {
        meth!(self.ax, set_title, (v,))?;
        Ok(self)
    }

    pub fn grid(&mut self) -> Result<&mut Self, Error> {
        meth!(self.ax, grid, (true,))?;
        Ok(self)
    }

    pub fn set_xlabel(&mut self, label: &str) -> Result<&mut Self, Error> {
        meth!(self.ax, set_xlabel, (label,))?;
        Ok(self)
    }

    pub fn set_ylabel(&mut self, label: &str) -> Result<&mut Self, Error> {
        meth!(self.ax, set_ylabel, (label,))?;
        Ok(self)
    }

    pub fn legend(&mut self) -> Result<&mut Self, Error> {
        meth!(self.ax, legend, ())?;
        Ok(self)
    }
}

#[derive(Clone, Default)]
struct PlotOptions<'a> {
    label: &'a str,
    marker: Option<&'a str>,
    color: Option<&'a str>,
    linestyle: Option<&'a str>,
    linewidth: Option<f64>,
}

impl PlotOptions<'_> {
    fn kwargs<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let kwargs = PyDict::new_bound(py);
        if !self.label.is_empty() {
            kwargs.set_item("label", self.label)?
        }
        if let Some(m) = self.marker {
            kwargs.set_item("marker", m)?
        }
        if let Some(c) = self.color {
            kwargs.set_item("color", c)?
        }
        if let Some(s) = self.linestyle {
            kwargs.set_item("linestyle", s)?
        }
        if let Some(w) = self.linewidth {
            kwargs.set_item("linewidth", w)?
        }
        Ok(kwargs)
    }
}

/// Declare methods to set the options assuming `self.options` exists.
macro_rules! set_plotoptions { () => {
    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.options.label = label;
        self
    }

    /// Marker style, e.g. "o", ".", "x".
    #[must_use]
    pub fn marker(mut self, marker: &'a str) -> Self {
        self.options.marker = Some(marker);
        self
    }

    #[must_use]
    pub fn color(mut self, color: &'a str) -> Self {
        self.options.color = Some(color);
        self
    }

    /// Line style, e.g. "-", "--", "-.", ":".
    #[must_use]
    pub fn linestyle(mut self, style: &'a str) -> Self {
        self.options.linestyle = Some(style);
        self
    }

    #[must_use]
    pub fn linewidth(mut self, w: f64) -> Self {
        self.options.linewidth = Some(w);
        self
    }
}}

pub struct XY<'a, D>
where D: ?Sized {
    axes: &'a Axes,
    fmt: &'a str,
    options: PlotOptions<'a>,
    x: &'a D,
    y: &'a D,
}

impl<'a, D> XY<'a, D>
where D: Data + ?Sized {
    set_plotoptions!();

    /// Matplotlib format string, e.g. "r." or "g--".
    #[must_use]
    pub fn fmt(mut self, fmt: &'a str) -> Self {
        self.fmt = fmt;
        self
    }

    /// Plot the data with the options specified in [`XY`].
    pub fn plot(self) -> Result<(), Error> {
        Python::with_gil(|py| -> Result<(), Error> {
            let x = self.x.to_numpy(py);
            let y = self.y.to_numpy(py);
            let kwargs = self.options.kwargs(py)?;
            self.axes.ax.bind(py).call_method(
                intern!(py, "plot"), (x, y, self.fmt), Some(&kwargs))?;
            Ok(())
        })
    }
}

pub struct AxHLine<'a> {
    axes: &'a Axes,
    options: PlotOptions<'a>,
    y: f64,
}

impl<'a> AxHLine<'a> {
    set_plotoptions!();

    /// Draw the line with the options specified in [`AxHLine`].
    pub fn plot(self) -> Result<(), Error> {
        Python::with_gil(|py| -> Result<(), Error> {
            let kwargs = self.options.kwargs(py)?;
            self.axes.ax.bind(py).call_method(
                intern!(py, "axhline"), (self.y,), Some(&kwargs))?;
            Ok(())
        })
    }
}
