use liminal_scene::SceneRegistry;

/// Registry inspector for developer tooling.
///
/// Provides read-only queries against the scene registry for debugging,
/// logging, and the CLI harness.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the registry state.
    pub fn summary(registry: &SceneRegistry) -> RegistrySummary {
        let active = registry.active();
        RegistrySummary {
            active_index: registry.active_index(),
            active_name: active.config().name,
            variant_count: registry.variant_count(),
            loaded_cells: active.loaded_cell_count(),
            total_props: (0..registry.variant_count())
                .filter_map(|index| registry.variant(index))
                .map(|variant| variant.graph().prop_count())
                .sum(),
        }
    }

    /// Summarize a single variant; `None` when the index is out of range.
    pub fn variant_summary(registry: &SceneRegistry, index: usize) -> Option<VariantSummary> {
        registry.variant(index).map(|variant| VariantSummary {
            index,
            name: variant.config().name,
            slug: variant.config().kind.slug(),
            visible: variant.is_visible(),
            loaded_cells: variant.loaded_cell_count(),
            prop_count: variant.graph().prop_count(),
        })
    }
}

/// Summary of registry state for the inspector.
#[derive(Debug, Clone)]
pub struct RegistrySummary {
    pub active_index: usize,
    pub active_name: &'static str,
    pub variant_count: usize,
    pub loaded_cells: usize,
    pub total_props: usize,
}

impl std::fmt::Display for RegistrySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Registry: active={} ({}) variants={} loaded_cells={} total_props={}",
            self.active_index,
            self.active_name,
            self.variant_count,
            self.loaded_cells,
            self.total_props
        )
    }
}

/// Detailed info about a single variant.
#[derive(Debug, Clone)]
pub struct VariantSummary {
    pub index: usize,
    pub name: &'static str,
    pub slug: &'static str,
    pub visible: bool,
    pub loaded_cells: usize,
    pub prop_count: usize,
}

impl std::fmt::Display for VariantSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Variant [{}] {} ({}) visible={} cells={} props={}",
            self.index, self.name, self.slug, self.visible, self.loaded_cells, self.prop_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn registry() -> SceneRegistry {
        let mut rng = StdRng::seed_from_u64(11);
        SceneRegistry::new(&mut rng)
    }

    #[test]
    fn summary_counts_the_fresh_registry() {
        let summary = SceneInspector::summary(&registry());
        assert_eq!(summary.active_index, 0);
        assert_eq!(summary.active_name, "Corridor");
        assert_eq!(summary.variant_count, 4);
        assert_eq!(summary.loaded_cells, 1);
        assert!(summary.total_props > 0);
    }

    #[test]
    fn variant_summary_tracks_visibility() {
        let mut registry = registry();
        registry.switch_to(2).unwrap();

        let gallery = SceneInspector::variant_summary(&registry, 2).unwrap();
        assert!(gallery.visible);
        assert_eq!(gallery.slug, "gallery");

        let corridor = SceneInspector::variant_summary(&registry, 0).unwrap();
        assert!(!corridor.visible);
    }

    #[test]
    fn out_of_range_variant_is_none() {
        assert!(SceneInspector::variant_summary(&registry(), 9).is_none());
    }

    #[test]
    fn summary_display() {
        let summary = SceneInspector::summary(&registry());
        let text = format!("{summary}");
        assert!(text.contains("active=0"));
        assert!(text.contains("Corridor"));
    }
}
