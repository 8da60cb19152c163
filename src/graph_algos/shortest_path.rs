use super::GraphNodeMap;

/// Construct the shortest path from the goal node to the start node
/// Returns the ordered path as a vector of nodes from start to goal, with the goal's cost
/// node_map: GraphNodeMap<N, C> - map of nodes with their parent index and cost
/// goal_index: usize - index of the goal node in the node_map
pub(crate) fn shortest_path<N, C>(node_map: &GraphNodeMap<N, C>, goal_index: usize) -> Option<(Vec<N>, C)>
where
    N: Clone,
    C: Copy,
{

    let (_, &(_, goal_cost)) = node_map.get_index(goal_index)?;

    let mut path = Vec::new();
    let mut current_index = goal_index;

    // Trace back from goal to start
    while current_index != usize::MAX {
        // Add the current node to the path
        let (node, &(parent_index, _)) = node_map.get_index(current_index)?;
        path.push(node.clone());
        current_index = parent_index;

        // a parent chain longer than the map means a cycle
        if path.len() > node_map.len() {
            return None;
        }
    }

    // The path is in reverse order, so reverse it
    path.reverse();

    Some((path, goal_cost))
}
