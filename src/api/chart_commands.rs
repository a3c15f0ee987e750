use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::core::ValuePoint;
use crate::error::{ChartError, ChartResult};
use crate::render::{ChartSurface, Screenshot, SeriesId};

use super::{ChartInstance, ChartSeriesIds, IndicatorOptions};

/// Imperative commands toolbars, hotkeys and export tools issue against a
/// chart they do not own.
pub trait ChartCommands {
    fn series(&self) -> ChartResult<ChartSeriesIds>;

    fn fit_content(&mut self) -> ChartResult<()>;

    fn scroll_to_real_time(&mut self) -> ChartResult<()>;

    fn add_indicator(
        &mut self,
        name: &str,
        data: Vec<ValuePoint>,
        options: IndicatorOptions,
    ) -> ChartResult<SeriesId>;

    /// Returns `Ok(false)` when no indicator of that name exists.
    fn remove_indicator(&mut self, name: &str) -> ChartResult<bool>;

    fn take_screenshot(&mut self) -> ChartResult<Screenshot>;
}

impl<S: ChartSurface> ChartCommands for ChartInstance<S> {
    fn series(&self) -> ChartResult<ChartSeriesIds> {
        Ok(ChartInstance::series(self))
    }

    fn fit_content(&mut self) -> ChartResult<()> {
        ChartInstance::fit_content(self);
        Ok(())
    }

    fn scroll_to_real_time(&mut self) -> ChartResult<()> {
        ChartInstance::scroll_to_real_time(self);
        Ok(())
    }

    fn add_indicator(
        &mut self,
        name: &str,
        data: Vec<ValuePoint>,
        options: IndicatorOptions,
    ) -> ChartResult<SeriesId> {
        ChartInstance::add_indicator(self, name, data, options)
    }

    fn remove_indicator(&mut self, name: &str) -> ChartResult<bool> {
        Ok(ChartInstance::remove_indicator(self, name))
    }

    fn take_screenshot(&mut self) -> ChartResult<Screenshot> {
        ChartInstance::take_screenshot(self)
    }
}

/// Shared command object bound to one chart instance.
///
/// Clones address the same instance. Commands issued while the instance is
/// already borrowed (for example from inside one of its own callbacks) fail
/// with `ChartError::Busy` instead of panicking.
pub struct ChartHandle<S: ChartSurface> {
    inner: Rc<RefCell<ChartInstance<S>>>,
}

impl<S: ChartSurface> Clone for ChartHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: ChartSurface> ChartHandle<S> {
    #[must_use]
    pub fn new(instance: ChartInstance<S>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(instance)),
        }
    }

    pub fn instance(&self) -> ChartResult<Ref<'_, ChartInstance<S>>> {
        self.inner.try_borrow().map_err(|_| ChartError::Busy)
    }

    pub fn instance_mut(&self) -> ChartResult<RefMut<'_, ChartInstance<S>>> {
        self.inner.try_borrow_mut().map_err(|_| ChartError::Busy)
    }

    /// Borrows the underlying surface.
    pub fn chart(&self) -> ChartResult<Ref<'_, S>> {
        Ok(Ref::map(self.instance()?, ChartInstance::chart))
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S: ChartSurface> ChartCommands for ChartHandle<S> {
    fn series(&self) -> ChartResult<ChartSeriesIds> {
        Ok(self.instance()?.series())
    }

    fn fit_content(&mut self) -> ChartResult<()> {
        self.instance_mut()?.fit_content();
        Ok(())
    }

    fn scroll_to_real_time(&mut self) -> ChartResult<()> {
        self.instance_mut()?.scroll_to_real_time();
        Ok(())
    }

    fn add_indicator(
        &mut self,
        name: &str,
        data: Vec<ValuePoint>,
        options: IndicatorOptions,
    ) -> ChartResult<SeriesId> {
        self.instance_mut()?.add_indicator(name, data, options)
    }

    fn remove_indicator(&mut self, name: &str) -> ChartResult<bool> {
        Ok(self.instance_mut()?.remove_indicator(name))
    }

    fn take_screenshot(&mut self) -> ChartResult<Screenshot> {
        self.instance_mut()?.take_screenshot()
    }
}
