//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! The tree lives in an arena: nodes sit in a `Vec` and refer to their
//! children by index, and the primitives are owned by the BVH itself.
//! Parents own their children exclusively and there are no back references,
//! so the structure is immutable once built.

use crate::{HitRecord, Hittable, RenderError, RenderResult};
use raytrace_math::{Axis, BoundingBox, Ray, Vector3};

/// A node of the arena.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BvhNode {
    /// A single primitive, by index into `Bvh::objects`.
    Leaf { object: usize, bbox: BoundingBox },
    /// Internal node; `bbox` is the union of both children's boxes.
    Branch {
        left: usize,
        right: usize,
        bbox: BoundingBox,
    },
}

impl BvhNode {
    fn bbox(&self) -> BoundingBox {
        match self {
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

/// Binary BVH over a finalized collection of hittables.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    objects: Vec<Box<dyn Hittable>>,
    root: usize,
}

impl Bvh {
    /// Build a BVH from a flat collection of objects.
    ///
    /// Objects are reordered in place while partitioning. An empty collection
    /// is rejected with [`RenderError::EmptyScene`].
    pub fn build(mut objects: Vec<Box<dyn Hittable>>) -> RenderResult<Self> {
        if objects.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        let mut nodes = Vec::with_capacity(2 * objects.len() - 1);
        let root = Self::partition(&mut objects, 0, &mut nodes);

        let bvh = Self {
            nodes,
            objects,
            root,
        };
        log::debug!(
            "BVH built: {} objects, {} nodes, depth {}",
            bvh.len(),
            bvh.node_count(),
            bvh.depth()
        );
        Ok(bvh)
    }

    /// Recursive median split. `offset` is the position of `objects[0]`
    /// within the full collection, so leaves can point at their primitive.
    ///
    /// Only sub-ranges are sorted below a node, which keeps leaf indices valid.
    fn partition(objects: &mut [Box<dyn Hittable>], offset: usize, nodes: &mut Vec<BvhNode>) -> usize {
        match objects.len() {
            1 => push(
                nodes,
                BvhNode::Leaf {
                    object: offset,
                    bbox: objects[0].bounding_box(),
                },
            ),
            2 => {
                let left = push(
                    nodes,
                    BvhNode::Leaf {
                        object: offset,
                        bbox: objects[0].bounding_box(),
                    },
                );
                let right = push(
                    nodes,
                    BvhNode::Leaf {
                        object: offset + 1,
                        bbox: objects[1].bounding_box(),
                    },
                );
                branch(nodes, left, right)
            }
            n => {
                let axis = split_axis(objects);

                objects.sort_unstable_by(|a, b| {
                    let a_val = axis.of(a.bounding_box().center());
                    let b_val = axis.of(b.bounding_box().center());
                    a_val
                        .partial_cmp(&b_val)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });

                let mid = n / 2;
                let (left_objects, right_objects) = objects.split_at_mut(mid);

                let left = Self::partition(left_objects, offset, nodes);
                let right = Self::partition(right_objects, offset + mid, nodes);
                branch(nodes, left, right)
            }
        }
    }

    /// Number of primitives.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Always false: empty BVHs cannot be built.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of arena nodes, leaves included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path, counting nodes.
    pub fn depth(&self) -> usize {
        self.depth_from(self.root)
    }

    fn depth_from(&self, index: usize) -> usize {
        match self.nodes[index] {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => {
                1 + self.depth_from(left).max(self.depth_from(right))
            }
        }
    }

    fn hit_node(&self, index: usize, ray: &Ray) -> HitRecord<'_> {
        match self.nodes[index] {
            BvhNode::Leaf { object, .. } => self.objects[object].hit(ray),
            BvhNode::Branch { left, right, bbox } => {
                if !bbox.through(ray) {
                    return HitRecord::miss();
                }

                let left_hit = self.hit_node(left, ray);
                let right_hit = self.hit_node(right, ray);

                if left_hit.t < right_hit.t {
                    left_hit
                } else {
                    right_hit
                }
            }
        }
    }
}

impl Hittable for Bvh {
    fn hit(&self, ray: &Ray) -> HitRecord<'_> {
        self.hit_node(self.root, ray)
    }

    fn bounding_box(&self) -> BoundingBox {
        self.nodes[self.root].bbox()
    }
}

fn push(nodes: &mut Vec<BvhNode>, node: BvhNode) -> usize {
    nodes.push(node);
    nodes.len() - 1
}

fn branch(nodes: &mut Vec<BvhNode>, left: usize, right: usize) -> usize {
    let bbox = BoundingBox::wraps(&nodes[left].bbox(), &nodes[right].bbox());
    push(nodes, BvhNode::Branch { left, right, bbox })
}

/// Pick the split axis from the spread of the objects' box centers.
///
/// The "average" is the plain sum of centers and the "variance" is the sum of
/// `center - sum`. That is not a real variance, but it decides which axis the
/// objects get sorted on, so changing it changes the tree.
fn split_axis(objects: &[Box<dyn Hittable>]) -> Axis {
    let sum = objects
        .iter()
        .map(|o| o.bounding_box().center())
        .fold(Vector3::ZERO, |acc, c| acc + c);

    let spread = objects
        .iter()
        .map(|o| o.bounding_box().center() - sum)
        .fold(Vector3::ZERO, |acc, d| acc + d);

    if spread.x > spread.y && spread.x > spread.z {
        Axis::X
    } else if spread.y > spread.z {
        Axis::Y
    } else {
        Axis::Z
    }
}
