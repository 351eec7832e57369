//! WASM bindings for the nebula-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! The JS host owns fetching (one request per primary concept, joined before
//! calling in) and all rendering; this boundary owns the graph state and
//! hands back finalized positions as JSON. Graph state lives in a single
//! thread-local application context so drag and tick calls can address the
//! graph built by the last successful `graph_init`. A data-selector change
//! in the UI is just another init call with the newly fetched payloads.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::data::{DataError, parse_dataset, parse_dataset_batch};
use crate::graph::{FilterPolicy, Graph, GraphConfig};
use crate::output::{DisplayFlags, ErrorInfo, GraphOutput, TreeOutput};
use crate::tree::{layout_tree, parse_tree};

/// Everything the boundary mutates, in one explicit context instead of
/// scattered globals.
#[derive(Default)]
struct AppContext {
    graph: Option<Graph>,
    flags: DisplayFlags,
}

thread_local! {
    static APP: RefCell<AppContext> = RefCell::new(AppContext::default());
}

fn report_error(err: &DataError) -> String {
    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
    serde_json::to_string(&GraphOutput::from_error(err.to_string()))
        .unwrap_or_else(|_| "{\"error\":{\"message\":\"serialization failed\"}}".to_string())
}

fn init_graph(datasets_result: Result<Vec<crate::data::RawDataset>, DataError>, config: GraphConfig) -> String {
    // On bad input the previously rendered graph stays untouched; the error
    // message goes to the activity indicator.
    let datasets = match datasets_result {
        Ok(datasets) => datasets,
        Err(err) => return report_error(&err),
    };

    APP.with(|app| {
        let mut app = app.borrow_mut();
        let mut graph = Graph::new(config);
        graph.init_with(&datasets);
        let output = GraphOutput::from_graph(&graph, app.flags);
        app.graph = Some(graph);
        serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
    })
}

/// Build a multi-primary-concept graph from a JSON array of payloads and
/// pre-relax it. Returns the stabilized layout as JSON.
#[wasm_bindgen]
pub fn graph_init(payloads_json: &str, width: f64, height: f64) -> String {
    let config = GraphConfig { width, height, ..GraphConfig::default() };
    init_graph(parse_dataset_batch(payloads_json), config)
}

/// Legacy single-dataset mode: one payload, similarity-threshold filtering.
#[wasm_bindgen]
pub fn graph_init_legacy(payload_json: &str, width: f64, height: f64) -> String {
    let config = GraphConfig {
        width,
        height,
        policy: FilterPolicy::SimilarityThreshold(0.995),
        ..GraphConfig::default()
    };
    init_graph(parse_dataset(payload_json).map(|d| vec![d]), config)
}

/// Interactive mode: advance the simulation by up to `max_steps` and return
/// current positions. A no-op returning the resting layout once cooled.
#[wasm_bindgen]
pub fn graph_tick(max_steps: u32) -> String {
    APP.with(|app| {
        let mut app = app.borrow_mut();
        let flags = app.flags;
        let Some(graph) = app.graph.as_mut() else {
            return "{}".to_string();
        };
        graph.tick(max_steps as usize);
        serde_json::to_string(&GraphOutput::from_graph(graph, flags))
            .unwrap_or_else(|_| "{}".to_string())
    })
}

/// Pin the node under the pointer and reheat the simulation. Returns false
/// if the node is unknown or another drag is active.
#[wasm_bindgen]
pub fn graph_drag_start(c_id: &str, x: f64, y: f64) -> bool {
    APP.with(|app| {
        app.borrow_mut()
            .graph
            .as_mut()
            .is_some_and(|graph| graph.drag_start(c_id, x, y))
    })
}

#[wasm_bindgen]
pub fn graph_drag_move(x: f64, y: f64) {
    APP.with(|app| {
        if let Some(graph) = app.borrow_mut().graph.as_mut() {
            graph.drag_move(x, y);
        }
    });
}

#[wasm_bindgen]
pub fn graph_drag_end() {
    APP.with(|app| {
        if let Some(graph) = app.borrow_mut().graph.as_mut() {
            graph.drag_end();
        }
    });
}

/// Flip the label display flag; returns the new value. Pure display state,
/// no re-layout.
#[wasm_bindgen]
pub fn graph_toggle_labels() -> bool {
    APP.with(|app| {
        let mut app = app.borrow_mut();
        app.flags.labels = !app.flags.labels;
        app.flags.labels
    })
}

#[wasm_bindgen]
pub fn graph_toggle_foci() -> bool {
    APP.with(|app| {
        let mut app = app.borrow_mut();
        app.flags.foci = !app.flags.foci;
        app.flags.foci
    })
}

#[wasm_bindgen]
pub fn graph_toggle_3d() -> bool {
    APP.with(|app| {
        let mut app = app.borrow_mut();
        app.flags.three_d = !app.flags.three_d;
        app.flags.three_d
    })
}

/// Lay out a concept-hierarchy tree payload. Stateless; does not touch the
/// graph context.
#[wasm_bindgen]
pub fn tree_layout(payload_json: &str, width: f64, height: f64) -> String {
    let output = match parse_tree(payload_json) {
        Ok(tree) => TreeOutput { nodes: layout_tree(&tree, width, height), error: None },
        Err(err) => {
            web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
            TreeOutput { nodes: vec![], error: Some(ErrorInfo { message: err.to_string() }) }
        }
    };
    serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
}
