use crate::{
    assets::{self, ASSETS, SceneEvent},
    context::{Context, InitContext},
    data_structures::scene_graph::SceneGraph,
    flow::{GraphicsFlow, Out},
    render::Render,
    resources::{AssetSource, ResourceDir},
    scene::{LoadTracker, SceneState},
};

/// The loaded assets, keyed by name.
pub struct Homestead<S = ResourceDir> {
    ctx: InitContext,
    source: S,
    graph: SceneGraph,
}

impl<S> Homestead<S> {
    pub fn new(ctx: InitContext, source: S) -> Self {
        Self {
            ctx,
            source,
            graph: SceneGraph::new(),
        }
    }
}

/// Record a load outcome and insert a placed node into `graph`.
///
/// Returns whether the graph grew. Failures and repeated keys leave it as it was.
pub fn apply<N>(graph: &mut SceneGraph<N>, loads: &mut LoadTracker, event: SceneEvent<N>) -> bool {
    match event {
        SceneEvent::Placed { name, node } => match graph.insert(name.clone(), node) {
            Ok(count) => {
                log::info!("Placed {name} ({count} assets in the scene)");
                loads.record_placed();
                true
            }
            Err(e) => {
                log::warn!("{e}");
                loads.record_failed();
                false
            }
        },
        SceneEvent::Failed { name, error } => {
            log::warn!("Asset {name} was not placed: {error:#}");
            loads.record_failed();
            false
        }
    }
}

impl<S: AssetSource + Clone + 'static> GraphicsFlow<SceneState, SceneEvent> for Homestead<S> {
    fn on_init(&mut self, _ctx: &mut Context, state: &mut SceneState) -> Out<SceneEvent> {
        state.loads.start(ASSETS.len());
        Out::FutEvent(
            ASSETS
                .iter()
                .map(|request| {
                    Box::new(assets::load(self.ctx.clone(), self.source.clone(), *request))
                        as Box<dyn Future<Output = SceneEvent>>
                })
                .collect(),
        )
    }

    fn on_custom_events(
        &mut self,
        _ctx: &Context,
        state: &mut SceneState,
        event: SceneEvent,
    ) -> Option<SceneEvent> {
        apply(&mut self.graph, &mut state.loads, event);
        None
    }

    fn on_render(&self) -> Render<'_> {
        self.graph.render()
    }
}
