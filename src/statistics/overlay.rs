//! Masked per-pixel reductions that collapse one axis of a cube
//!
//! Cubes are laid out `[z, y, x]`, so the standard row-major layout has `x`
//! varying fastest, then `y`, then `z`. Collapsing the depth axis (axis 0)
//! yields a `(ny, nx)` plane indexed `[y, x]`.
//!
//! A mask entry of `true` excludes the matching cube sample. A pixel whose
//! samples are all excluded receives [`OverlayOptions::fill_value`], which
//! defaults to [`Sample::NO_DATA`] (NaN for floats, zero for integers); use
//! [`valid_counts`] to tell such pixels apart from genuine values.

use super::operations::{StatOperation, StatisticalReduction};
use crate::errors::{CubeStatError, Result};
use crate::numeric::{type_name, Sample};
use ndarray::{Array2, ArrayBase, ArrayView1, ArrayView3, Axis, Data, Ix3, Zip};
use tracing::{debug, instrument, warn};

/// Extent of a cube along x, y and z
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeShape {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl CubeShape {
    #[must_use]
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Total element count `nx * ny * nz`, saturating at `usize::MAX`
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nx.saturating_mul(self.ny).saturating_mul(self.nz)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total element count, or `None` if `nx * ny` or `nx * ny * nz` overflows
    #[must_use]
    pub const fn checked_len(&self) -> Option<usize> {
        match self.nx.checked_mul(self.ny) {
            Some(layer) => layer.checked_mul(self.nz),
            None => None,
        }
    }

    /// Total element count
    ///
    /// # Errors
    ///
    /// Returns [`CubeStatError::ShapeMismatch`] if the count overflows `usize`.
    pub fn element_count(&self) -> Result<usize> {
        self.checked_len().ok_or_else(|| CubeStatError::ShapeMismatch {
            expected: "a cube whose element count fits in usize".to_string(),
            found: format!("{}x{}x{}", self.nx, self.ny, self.nz),
        })
    }

    /// ndarray shape `(nz, ny, nx)`
    #[must_use]
    pub const fn dim(&self) -> (usize, usize, usize) {
        (self.nz, self.ny, self.nx)
    }
}

/// Tuning for [`Overlay`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayOptions<T> {
    /// Emitted for pixels without any usable sample
    pub fill_value: T,
    /// Also exclude NaN and infinite float samples
    pub skip_non_finite: bool,
    /// Reduce pixels on the rayon pool
    pub parallel: bool,
}

impl<T: Sample> Default for OverlayOptions<T> {
    fn default() -> Self {
        Self {
            fill_value: T::NO_DATA,
            skip_non_finite: false,
            parallel: true,
        }
    }
}

/// Masked axis-reduction engine
#[derive(Debug, Clone, Copy)]
pub struct Overlay<T> {
    options: OverlayOptions<T>,
}

impl<T: Sample> Default for Overlay<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample> Overlay<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(OverlayOptions::default())
    }

    #[must_use]
    pub fn with_options(options: OverlayOptions<T>) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &OverlayOptions<T> {
        &self.options
    }

    /// Collapse `axis` of `cube`, skipping samples flagged in `mask`
    ///
    /// # Errors
    ///
    /// Returns [`CubeStatError::AxisOutOfBounds`] for `axis >= 3` and
    /// [`CubeStatError::ShapeMismatch`] if the mask shape differs from the cube.
    #[instrument(
        level = "debug",
        skip_all,
        fields(shape = ?cube.shape(), axis = axis, op = operation.as_str(), dtype = type_name::<T>())
    )]
    pub fn reduce(
        &self,
        cube: ArrayView3<'_, T>,
        mask: Option<ArrayView3<'_, bool>>,
        axis: usize,
        operation: StatOperation,
    ) -> Result<Array2<T>> {
        check_axis(axis)?;
        if let Some(mask) = &mask {
            check_mask(cube.shape(), mask.shape())?;
        }

        debug!(
            pixels = cube.len() / cube.len_of(Axis(axis)).max(1),
            threads = rayon::current_num_threads(),
            parallel = self.options.parallel,
            "reducing cube"
        );

        let lanes = cube.lanes(Axis(axis));
        let pixels: Array2<Option<T>> = match mask {
            Some(mask) => {
                let zip = Zip::from(lanes).and(mask.lanes(Axis(axis)));
                if self.options.parallel {
                    zip.par_map_collect(|lane, m| self.reduce_lane(lane, Some(m), operation))
                } else {
                    zip.map_collect(|lane, m| self.reduce_lane(lane, Some(m), operation))
                }
            }
            None => {
                let zip = Zip::from(lanes);
                if self.options.parallel {
                    zip.par_map_collect(|lane| self.reduce_lane(lane, None, operation))
                } else {
                    zip.map_collect(|lane| self.reduce_lane(lane, None, operation))
                }
            }
        };

        let empty = pixels.iter().filter(|p| p.is_none()).count();
        if empty > 0 {
            warn!(
                empty_pixels = empty,
                fill = %self.options.fill_value,
                "pixels without unmasked samples were filled"
            );
        }

        let fill = self.options.fill_value;
        Ok(pixels.mapv(|p| p.unwrap_or(fill)))
    }

    /// Collapse the depth axis of a flat `x`-fastest buffer
    ///
    /// # Errors
    ///
    /// Returns [`CubeStatError::ShapeMismatch`] if `data` or `mask` do not hold
    /// exactly `shape.len()` elements.
    pub fn reduce_slice(
        &self,
        data: &[T],
        mask: &[bool],
        shape: CubeShape,
        operation: StatOperation,
    ) -> Result<Array2<T>> {
        check_len("cube", shape, data.len())?;
        check_len("mask", shape, mask.len())?;

        let cube = ArrayView3::from_shape(shape.dim(), data)?;
        let mask = ArrayView3::from_shape(shape.dim(), mask)?;
        self.reduce(cube, Some(mask), 0, operation)
    }

    fn reduce_lane(
        &self,
        lane: ArrayView1<'_, T>,
        mask: Option<ArrayView1<'_, bool>>,
        operation: StatOperation,
    ) -> Option<T> {
        let mut values: Vec<T> = match mask {
            Some(mask) => lane
                .iter()
                .zip(mask.iter())
                .filter(|(_, &masked)| !masked)
                .map(|(&v, _)| v)
                .collect(),
            None => lane.to_vec(),
        };
        if self.options.skip_non_finite {
            values.retain(|v| v.is_finite_sample());
        }
        operation.apply(&mut values)
    }
}

/// Collapse the depth axis of a flat `x`-fastest cube with default options
///
/// The result has shape `(ny, nx)`.
///
/// # Errors
///
/// Returns [`CubeStatError::ShapeMismatch`] if `data` or `mask` do not hold
/// exactly `shape.len()` elements.
pub fn overlay<T: Sample>(
    data: &[T],
    mask: &[bool],
    shape: CubeShape,
    operation: StatOperation,
) -> Result<Array2<T>> {
    Overlay::new().reduce_slice(data, mask, shape, operation)
}

/// Number of unmasked samples behind each pixel of a reduction along `axis`
///
/// # Errors
///
/// Returns [`CubeStatError::AxisOutOfBounds`] for `axis >= 3`.
pub fn valid_counts(mask: ArrayView3<'_, bool>, axis: usize) -> Result<Array2<usize>> {
    check_axis(axis)?;
    Ok(Zip::from(mask.lanes(Axis(axis))).map_collect(|m| m.iter().filter(|&&b| !b).count()))
}

impl<T, S> StatisticalReduction<T> for ArrayBase<S, Ix3>
where
    T: Sample,
    S: Data<Elem = T>,
{
    fn reduce_along_axis(&self, axis: usize, operation: StatOperation) -> Result<Array2<T>> {
        Overlay::new().reduce(self.view(), None, axis, operation)
    }

    fn masked_reduce_along_axis(
        &self,
        axis: usize,
        mask: &ArrayView3<'_, bool>,
        operation: StatOperation,
    ) -> Result<Array2<T>> {
        Overlay::new().reduce(self.view(), Some(mask.view()), axis, operation)
    }
}

fn check_axis(axis: usize) -> Result<()> {
    if axis >= 3 {
        return Err(CubeStatError::AxisOutOfBounds { axis, ndim: 3 });
    }
    Ok(())
}

fn check_mask(cube: &[usize], mask: &[usize]) -> Result<()> {
    if cube != mask {
        return Err(CubeStatError::ShapeMismatch {
            expected: format!("mask of shape {cube:?}"),
            found: format!("{mask:?}"),
        });
    }
    Ok(())
}

fn check_len(what: &str, shape: CubeShape, found: usize) -> Result<()> {
    let expected = shape.element_count()?;
    if found != expected {
        return Err(CubeStatError::ShapeMismatch {
            expected: format!(
                "{what} of {expected} elements ({}x{}x{})",
                shape.nx,
                shape.ny,
                shape.nz
            ),
            found: format!("{found} elements"),
        });
    }
    Ok(())
}
