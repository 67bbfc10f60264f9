// Grid module registry - process-wide, initialized exactly once
//
// Grid operations refuse to run until initialize() has been called.

use once_cell::sync::OnceCell;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GridModule {
    // Row model and core features
    ClientSideRowModel,
    Pagination,
    CellStyle,
    Validation,
    NumberFilter,
    DateFilter,

    // Advanced features
    RowGrouping,
    SetFilter,
    ColumnsToolPanel,
    FiltersToolPanel,
    SideBar,
    IntegratedCharts,
}

const DEFAULT_MODULES: [GridModule; 12] = [
    GridModule::ClientSideRowModel,
    GridModule::Pagination,
    GridModule::CellStyle,
    GridModule::Validation,
    GridModule::NumberFilter,
    GridModule::DateFilter,
    GridModule::RowGrouping,
    GridModule::SetFilter,
    GridModule::ColumnsToolPanel,
    GridModule::FiltersToolPanel,
    GridModule::SideBar,
    GridModule::IntegratedCharts,
];

#[derive(Debug, Serialize)]
pub struct ModuleRegistry {
    modules: Vec<GridModule>,
    theme: &'static str,
}

impl ModuleRegistry {
    pub fn modules(&self) -> &[GridModule] {
        &self.modules
    }

    pub fn contains(&self, module: GridModule) -> bool {
        self.modules.contains(&module)
    }

    pub fn theme(&self) -> &'static str {
        self.theme
    }
}

static REGISTRY: OnceCell<ModuleRegistry> = OnceCell::new();

/// Register grid modules. Idempotent: later calls return the first registry.
pub fn initialize() -> &'static ModuleRegistry {
    REGISTRY.get_or_init(|| {
        tracing::debug!(modules = DEFAULT_MODULES.len(), "registering grid modules");
        ModuleRegistry {
            modules: DEFAULT_MODULES.to_vec(),
            theme: "legacy",
        }
    })
}

pub fn get() -> Option<&'static ModuleRegistry> {
    REGISTRY.get()
}

pub fn is_initialized() -> bool {
    REGISTRY.get().is_some()
}

pub fn is_registered(module: GridModule) -> bool {
    REGISTRY.get().map(|r| r.contains(module)).unwrap_or(false)
}
