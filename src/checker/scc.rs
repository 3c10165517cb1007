use std::collections::{BTreeSet, HashMap};

use crate::model::{Target, TargetModel};

#[derive(Debug, Default, Clone)]
struct VertexState {
    index: Option<usize>,
    lowlink: usize,
    on_stack: bool,
}

struct Frame {
    vertex: usize,
    neighbors: Vec<usize>,
    next: usize,
}

struct Tarjan<'m> {
    model: &'m TargetModel,
    ids: HashMap<Target, usize>,
    vertices: Vec<Target>,
    states: Vec<VertexState>,
    stack: Vec<usize>,
    next_index: usize,
    components: Vec<BTreeSet<Target>>,
}

impl<'m> Tarjan<'m> {
    fn new(model: &'m TargetModel) -> Self {
        Self {
            model,
            ids: HashMap::new(),
            vertices: Vec::new(),
            states: Vec::new(),
            stack: Vec::new(),
            next_index: 0,
            components: Vec::new(),
        }
    }

    fn id_of(&mut self, target: &Target) -> usize {
        if let Some(id) = self.ids.get(target) {
            return *id;
        }
        let id = self.vertices.len();
        self.ids.insert(target.clone(), id);
        self.vertices.push(target.clone());
        self.states.push(VertexState::default());
        id
    }

    /// Assign index/lowlink to `vertex`, push it on the component stack and
    /// build its DFS frame.
    fn open(&mut self, vertex: usize) -> Frame {
        self.states[vertex].index = Some(self.next_index);
        self.states[vertex].lowlink = self.next_index;
        self.states[vertex].on_stack = true;
        self.stack.push(vertex);
        self.next_index += 1;

        let target = self.vertices[vertex].clone();
        let dependencies: Vec<Target> = self
            .model
            .get_target_data(&target)
            .map(|data| data.dependencies.iter().cloned().collect())
            .unwrap_or_default();
        let neighbors = dependencies.iter().map(|dep| self.id_of(dep)).collect();

        Frame {
            vertex,
            neighbors,
            next: 0,
        }
    }

    fn close(&mut self, vertex: usize) {
        if Some(self.states[vertex].lowlink) != self.states[vertex].index {
            return;
        }
        let mut component = BTreeSet::new();
        loop {
            let member = self.stack.pop().expect("component root is on the stack");
            self.states[member].on_stack = false;
            component.insert(self.vertices[member].clone());
            if member == vertex {
                break;
            }
        }
        // only non-trivial components are interesting
        if component.len() > 1 {
            self.components.push(component);
        }
    }

    fn strong_connect(&mut self, root: usize) {
        let mut call_stack = vec![self.open(root)];

        while let Some(frame) = call_stack.last_mut() {
            let vertex = frame.vertex;
            if frame.next < frame.neighbors.len() {
                let neighbor = frame.neighbors[frame.next];
                frame.next += 1;
                match self.states[neighbor].index {
                    None => {
                        let child = self.open(neighbor);
                        call_stack.push(child);
                    }
                    Some(index) if self.states[neighbor].on_stack => {
                        self.states[vertex].lowlink = self.states[vertex].lowlink.min(index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            self.close(vertex);
            call_stack.pop();
            if let Some(parent) = call_stack.last() {
                self.states[parent.vertex].lowlink =
                    self.states[parent.vertex].lowlink.min(self.states[vertex].lowlink);
            }
        }
    }
}

/// Tarjan's algorithm over the `dependencies` edge of the model.
///
/// Returns only the non-trivial components (size >= 2), in discovery order.
/// Dependency edges to targets without model data still materialize the
/// vertex, so those targets can appear as sinks. The recursion is unrolled
/// over an explicit frame stack so deep graphs cannot overflow the thread
/// stack.
#[must_use]
pub fn strongly_connected_dependencies(model: &TargetModel) -> Vec<BTreeSet<Target>> {
    let mut tarjan = Tarjan::new(model);

    let roots: Vec<usize> = {
        let targets: Vec<Target> = model.targets().map(|(target, _)| target.clone()).collect();
        targets.iter().map(|target| tarjan.id_of(target)).collect()
    };
    for root in roots {
        if tarjan.states[root].index.is_none() {
            tarjan.strong_connect(root);
        }
    }

    tarjan.components
}

#[cfg(test)]
#[path = "scc_tests.rs"]
mod tests;
