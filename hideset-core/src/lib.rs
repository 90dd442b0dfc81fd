pub mod mesh {
    use glam::DVec3;
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    /// 每种元素可挂载的整数属性层上限，对应宿主 CustomData 的层数限制。
    pub const MAX_LAYERS_PER_KIND: usize = 32;

    macro_rules! element_handle {
        ($(#[$meta:meta])* $name:ident) => {
            $(#[$meta])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            )]
            pub struct $name(u32);

            impl $name {
                #[inline]
                pub fn new(raw: u32) -> Self {
                    Self(raw)
                }

                #[inline]
                pub fn from_index(index: usize) -> Self {
                    Self(index as u32)
                }

                /// 外部输入的下标超出句柄范围时返回 `None`。
                #[inline]
                pub fn try_from_index(index: usize) -> Option<Self> {
                    u32::try_from(index).ok().map(Self)
                }

                /// 会话内的稠密下标，删除元素后会被重新编号。
                #[inline]
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }
        };
    }

    element_handle!(
        /// 顶点句柄。
        VertId
    );
    element_handle!(
        /// 边句柄。
        EdgeId
    );
    element_handle!(
        /// 面句柄。
        FaceId
    );

    /// 网格元素的三种类别。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum MeshKind {
        Vert,
        Edge,
        Face,
    }

    impl MeshKind {
        pub const ALL: [MeshKind; 3] = [MeshKind::Vert, MeshKind::Edge, MeshKind::Face];

        #[inline]
        pub fn handle(self, index: usize) -> ElementHandle {
            match self {
                MeshKind::Vert => ElementHandle::Vert(VertId::from_index(index)),
                MeshKind::Edge => ElementHandle::Edge(EdgeId::from_index(index)),
                MeshKind::Face => ElementHandle::Face(FaceId::from_index(index)),
            }
        }

        pub fn try_handle(self, index: usize) -> Option<ElementHandle> {
            Some(match self {
                MeshKind::Vert => ElementHandle::Vert(VertId::try_from_index(index)?),
                MeshKind::Edge => ElementHandle::Edge(EdgeId::try_from_index(index)?),
                MeshKind::Face => ElementHandle::Face(FaceId::try_from_index(index)?),
            })
        }
    }

    /// 任意类别的网格元素句柄。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ElementHandle {
        Vert(VertId),
        Edge(EdgeId),
        Face(FaceId),
    }

    impl ElementHandle {
        #[inline]
        pub fn kind(self) -> MeshKind {
            match self {
                ElementHandle::Vert(_) => MeshKind::Vert,
                ElementHandle::Edge(_) => MeshKind::Edge,
                ElementHandle::Face(_) => MeshKind::Face,
            }
        }

        #[inline]
        pub fn index(self) -> usize {
            match self {
                ElementHandle::Vert(id) => id.index(),
                ElementHandle::Edge(id) => id.index(),
                ElementHandle::Face(id) => id.index(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum MeshError {
        #[error("{kind:?} element {index} does not exist")]
        StaleHandle { kind: MeshKind, index: usize },
        #[error("{kind:?} layer group is full")]
        LayerLimit { kind: MeshKind },
        #[error("layer {name:?} already exists")]
        DuplicateLayer { name: String },
        #[error("layer {0} does not exist")]
        StaleLayer(usize),
        #[error("an edge needs two distinct vertices")]
        DegenerateEdge,
        #[error("a face needs at least three distinct vertices, got {0}")]
        DegenerateFace(usize),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayerId(usize);

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct IntLayer {
        name: String,
        values: Vec<i64>,
    }

    /// 按名称索引的整数属性列，每个元素占一行，缺省值为 0。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct IntLayers {
        layers: Vec<IntLayer>,
    }

    impl IntLayers {
        #[inline]
        pub fn get(&self, name: &str) -> Option<LayerId> {
            self.layers
                .iter()
                .position(|layer| layer.name == name)
                .map(LayerId)
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.layers.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.layers.is_empty()
        }

        #[inline]
        pub fn value(&self, layer: LayerId, row: usize) -> Option<i64> {
            self.layers.get(layer.0)?.values.get(row).copied()
        }

        fn add(&mut self, kind: MeshKind, name: &str, rows: usize) -> Result<LayerId, MeshError> {
            if self.get(name).is_some() {
                return Err(MeshError::DuplicateLayer {
                    name: name.to_string(),
                });
            }
            if self.layers.len() >= MAX_LAYERS_PER_KIND {
                return Err(MeshError::LayerLimit { kind });
            }
            self.layers.push(IntLayer {
                name: name.to_string(),
                values: vec![0; rows],
            });
            Ok(LayerId(self.layers.len() - 1))
        }

        fn set(&mut self, layer: LayerId, row: usize, value: i64) -> Result<(), MeshError> {
            let column = self
                .layers
                .get_mut(layer.0)
                .ok_or(MeshError::StaleLayer(layer.0))?;
            if row >= column.values.len() {
                column.values.resize(row + 1, 0);
            }
            column.values[row] = value;
            Ok(())
        }

        fn push_row(&mut self) {
            for layer in &mut self.layers {
                layer.values.push(0);
            }
        }

        fn remove_row(&mut self, row: usize) {
            for layer in &mut self.layers {
                if row < layer.values.len() {
                    layer.values.remove(row);
                }
            }
        }
    }

    /// 元素表：元素本体与其属性层同步增删。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ElementTable<T> {
        items: Vec<T>,
        #[serde(default)]
        layers: IntLayers,
    }

    impl<T> Default for ElementTable<T> {
        fn default() -> Self {
            Self {
                items: Vec::new(),
                layers: IntLayers::default(),
            }
        }
    }

    impl<T> ElementTable<T> {
        #[inline]
        pub fn len(&self) -> usize {
            self.items.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }

        #[inline]
        pub fn layers(&self) -> &IntLayers {
            &self.layers
        }

        fn push(&mut self, item: T) -> usize {
            self.items.push(item);
            self.layers.push_row();
            self.items.len() - 1
        }

        fn remove(&mut self, index: usize) -> T {
            self.layers.remove_row(index);
            self.items.remove(index)
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Vertex {
        pub position: DVec3,
        #[serde(default)]
        pub hide: bool,
        #[serde(default)]
        pub select: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Edge {
        pub verts: [VertId; 2],
        #[serde(default)]
        pub hide: bool,
        #[serde(default)]
        pub select: bool,
    }

    impl Edge {
        #[inline]
        pub fn connects(&self, a: VertId, b: VertId) -> bool {
            (self.verts[0] == a && self.verts[1] == b) || (self.verts[0] == b && self.verts[1] == a)
        }

        #[inline]
        pub fn uses(&self, v: VertId) -> bool {
            self.verts[0] == v || self.verts[1] == v
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Face {
        pub verts: Vec<VertId>,
        #[serde(default)]
        pub hide: bool,
        #[serde(default)]
        pub select: bool,
    }

    impl Face {
        /// 边界上的有向顶点对（首尾相接）。
        pub fn boundary(&self) -> impl Iterator<Item = (VertId, VertId)> + '_ {
            let n = self.verts.len();
            (0..n).map(move |i| (self.verts[i], self.verts[(i + 1) % n]))
        }

        #[inline]
        pub fn has_edge(&self, a: VertId, b: VertId) -> bool {
            self.boundary()
                .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
        }

        #[inline]
        pub fn uses(&self, v: VertId) -> bool {
            self.verts.contains(&v)
        }
    }

    /// 可编辑网格。元素句柄只在一次编辑会话内稳定，删除元素后后续元素会被重新编号。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Mesh {
        verts: ElementTable<Vertex>,
        edges: ElementTable<Edge>,
        faces: ElementTable<Face>,
    }

    impl Mesh {
        pub fn new() -> Self {
            Self::default()
        }

        /// 构造一个以原点为中心的立方体（8 顶点、12 边、6 面）。
        pub fn cube(size: f64) -> Self {
            let h = size * 0.5;
            let mut mesh = Self::new();
            let corners = [
                DVec3::new(-h, -h, -h),
                DVec3::new(h, -h, -h),
                DVec3::new(h, h, -h),
                DVec3::new(-h, h, -h),
                DVec3::new(-h, -h, h),
                DVec3::new(h, -h, h),
                DVec3::new(h, h, h),
                DVec3::new(-h, h, h),
            ];
            let v: Vec<VertId> = corners.iter().map(|p| mesh.add_vert(*p)).collect();
            let quads = [
                [0, 3, 2, 1],
                [4, 5, 6, 7],
                [0, 1, 5, 4],
                [1, 2, 6, 5],
                [2, 3, 7, 6],
                [3, 0, 4, 7],
            ];
            for quad in quads {
                mesh.link_face(&quad.map(|i| v[i]));
            }
            mesh
        }

        #[inline]
        pub fn count(&self, kind: MeshKind) -> usize {
            match kind {
                MeshKind::Vert => self.verts.len(),
                MeshKind::Edge => self.edges.len(),
                MeshKind::Face => self.faces.len(),
            }
        }

        /// 按存储顺序遍历某一类元素的全部句柄。
        pub fn handles(&self, kind: MeshKind) -> impl Iterator<Item = ElementHandle> + use<> {
            let count = self.count(kind);
            (0..count).map(move |index| kind.handle(index))
        }

        pub fn add_vert(&mut self, position: DVec3) -> VertId {
            VertId::from_index(self.verts.push(Vertex {
                position,
                hide: false,
                select: false,
            }))
        }

        /// 添加边；若两点间已存在边则直接返回已有句柄。
        pub fn add_edge(&mut self, a: VertId, b: VertId) -> Result<EdgeId, MeshError> {
            self.check_vert(a)?;
            self.check_vert(b)?;
            if a == b {
                return Err(MeshError::DegenerateEdge);
            }
            Ok(self.link_edge(a, b))
        }

        fn link_edge(&mut self, a: VertId, b: VertId) -> EdgeId {
            if let Some(existing) = self.find_edge(a, b) {
                return existing;
            }
            EdgeId::from_index(self.edges.push(Edge {
                verts: [a, b],
                hide: false,
                select: false,
            }))
        }

        /// 添加面，并补齐缺失的边界边。
        pub fn add_face(&mut self, verts: &[VertId]) -> Result<FaceId, MeshError> {
            for v in verts {
                self.check_vert(*v)?;
            }
            let mut distinct = verts.to_vec();
            distinct.sort();
            distinct.dedup();
            if distinct.len() < 3 || distinct.len() != verts.len() {
                return Err(MeshError::DegenerateFace(distinct.len()));
            }
            Ok(self.link_face(verts))
        }

        /// 顶点须已校验：存在且互不相同。
        fn link_face(&mut self, verts: &[VertId]) -> FaceId {
            for i in 0..verts.len() {
                self.link_edge(verts[i], verts[(i + 1) % verts.len()]);
            }
            FaceId::from_index(self.faces.push(Face {
                verts: verts.to_vec(),
                hide: false,
                select: false,
            }))
        }

        pub fn find_edge(&self, a: VertId, b: VertId) -> Option<EdgeId> {
            self.edges
                .items
                .iter()
                .position(|edge| edge.connects(a, b))
                .map(EdgeId::from_index)
        }

        #[inline]
        pub fn vert(&self, id: VertId) -> Option<&Vertex> {
            self.verts.items.get(id.index())
        }

        #[inline]
        pub fn vert_mut(&mut self, id: VertId) -> Option<&mut Vertex> {
            self.verts.items.get_mut(id.index())
        }

        #[inline]
        pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
            self.edges.items.get(id.index())
        }

        #[inline]
        pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
            self.edges.items.get_mut(id.index())
        }

        #[inline]
        pub fn face(&self, id: FaceId) -> Option<&Face> {
            self.faces.items.get(id.index())
        }

        #[inline]
        pub fn face_mut(&mut self, id: FaceId) -> Option<&mut Face> {
            self.faces.items.get_mut(id.index())
        }

        pub fn verts(&self) -> impl Iterator<Item = (VertId, &Vertex)> {
            self.verts
                .items
                .iter()
                .enumerate()
                .map(|(i, v)| (VertId::from_index(i), v))
        }

        pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
            self.edges
                .items
                .iter()
                .enumerate()
                .map(|(i, e)| (EdgeId::from_index(i), e))
        }

        pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> {
            self.faces
                .items
                .iter()
                .enumerate()
                .map(|(i, f)| (FaceId::from_index(i), f))
        }

        #[inline]
        pub fn contains(&self, handle: ElementHandle) -> bool {
            handle.index() < self.count(handle.kind())
        }

        /// 与顶点相连的全部面。
        pub fn vert_link_faces(&self, v: VertId) -> Vec<FaceId> {
            self.faces()
                .filter(|(_, face)| face.uses(v))
                .map(|(id, _)| id)
                .collect()
        }

        /// 与边相连的全部面（边的两端在面环上相邻）。
        pub fn edge_link_faces(&self, e: EdgeId) -> Vec<FaceId> {
            let Some(edge) = self.edge(e) else {
                return Vec::new();
            };
            let [a, b] = edge.verts;
            self.faces()
                .filter(|(_, face)| face.has_edge(a, b))
                .map(|(id, _)| id)
                .collect()
        }

        pub fn hide_flag(&self, handle: ElementHandle) -> Option<bool> {
            match handle {
                ElementHandle::Vert(id) => self.vert(id).map(|v| v.hide),
                ElementHandle::Edge(id) => self.edge(id).map(|e| e.hide),
                ElementHandle::Face(id) => self.face(id).map(|f| f.hide),
            }
        }

        pub fn set_hide_flag(&mut self, handle: ElementHandle, hidden: bool) -> Result<(), MeshError> {
            let slot = match handle {
                ElementHandle::Vert(id) => self.vert_mut(id).map(|v| &mut v.hide),
                ElementHandle::Edge(id) => self.edge_mut(id).map(|e| &mut e.hide),
                ElementHandle::Face(id) => self.face_mut(id).map(|f| &mut f.hide),
            };
            let slot = slot.ok_or(MeshError::StaleHandle {
                kind: handle.kind(),
                index: handle.index(),
            })?;
            *slot = hidden;
            Ok(())
        }

        pub fn is_selected(&self, handle: ElementHandle) -> bool {
            match handle {
                ElementHandle::Vert(id) => self.vert(id).is_some_and(|v| v.select),
                ElementHandle::Edge(id) => self.edge(id).is_some_and(|e| e.select),
                ElementHandle::Face(id) => self.face(id).is_some_and(|f| f.select),
            }
        }

        pub fn set_selected(&mut self, handle: ElementHandle, selected: bool) -> Result<(), MeshError> {
            let slot = match handle {
                ElementHandle::Vert(id) => self.vert_mut(id).map(|v| &mut v.select),
                ElementHandle::Edge(id) => self.edge_mut(id).map(|e| &mut e.select),
                ElementHandle::Face(id) => self.face_mut(id).map(|f| &mut f.select),
            };
            let slot = slot.ok_or(MeshError::StaleHandle {
                kind: handle.kind(),
                index: handle.index(),
            })?;
            *slot = selected;
            Ok(())
        }

        pub fn deselect_all(&mut self) {
            self.verts.items.iter_mut().for_each(|v| v.select = false);
            self.edges.items.iter_mut().for_each(|e| e.select = false);
            self.faces.items.iter_mut().for_each(|f| f.select = false);
        }

        /// 当前被选中的某类元素，按存储顺序返回。
        pub fn selected(&self, kind: MeshKind) -> Vec<ElementHandle> {
            self.handles(kind)
                .filter(|handle| self.is_selected(*handle))
                .collect()
        }

        #[inline]
        pub fn layers(&self, kind: MeshKind) -> &IntLayers {
            match kind {
                MeshKind::Vert => &self.verts.layers,
                MeshKind::Edge => &self.edges.layers,
                MeshKind::Face => &self.faces.layers,
            }
        }

        #[inline]
        pub fn int_layer(&self, kind: MeshKind, name: &str) -> Option<LayerId> {
            self.layers(kind).get(name)
        }

        /// 新建整数层，已有元素的取值初始化为 0。
        pub fn add_int_layer(&mut self, kind: MeshKind, name: &str) -> Result<LayerId, MeshError> {
            match kind {
                MeshKind::Vert => self.verts.layers.add(kind, name, self.verts.items.len()),
                MeshKind::Edge => self.edges.layers.add(kind, name, self.edges.items.len()),
                MeshKind::Face => self.faces.layers.add(kind, name, self.faces.items.len()),
            }
        }

        #[inline]
        pub fn layer_value(&self, handle: ElementHandle, layer: LayerId) -> Option<i64> {
            self.layers(handle.kind()).value(layer, handle.index())
        }

        pub fn set_layer_value(
            &mut self,
            handle: ElementHandle,
            layer: LayerId,
            value: i64,
        ) -> Result<(), MeshError> {
            if !self.contains(handle) {
                return Err(MeshError::StaleHandle {
                    kind: handle.kind(),
                    index: handle.index(),
                });
            }
            match handle.kind() {
                MeshKind::Vert => self.verts.layers.set(layer, handle.index(), value),
                MeshKind::Edge => self.edges.layers.set(layer, handle.index(), value),
                MeshKind::Face => self.faces.layers.set(layer, handle.index(), value),
            }
        }

        pub fn remove_face(&mut self, f: FaceId) -> Result<(), MeshError> {
            self.check(ElementHandle::Face(f))?;
            self.faces.remove(f.index());
            Ok(())
        }

        /// 删除边及其相连的面。
        pub fn remove_edge(&mut self, e: EdgeId) -> Result<(), MeshError> {
            self.check(ElementHandle::Edge(e))?;
            let mut faces = self.edge_link_faces(e);
            faces.sort_unstable_by(|a, b| b.cmp(a));
            for face in faces {
                self.faces.remove(face.index());
            }
            self.edges.remove(e.index());
            Ok(())
        }

        /// 删除顶点及其相连的边与面，并对后续顶点重新编号。
        pub fn remove_vert(&mut self, v: VertId) -> Result<(), MeshError> {
            self.check_vert(v)?;
            let mut faces = self.vert_link_faces(v);
            faces.sort_unstable_by(|a, b| b.cmp(a));
            for face in faces {
                self.faces.remove(face.index());
            }
            let mut edges: Vec<usize> = self
                .edges
                .items
                .iter()
                .enumerate()
                .filter(|(_, edge)| edge.uses(v))
                .map(|(i, _)| i)
                .collect();
            edges.sort_unstable_by(|a, b| b.cmp(a));
            for edge in edges {
                self.edges.remove(edge);
            }
            self.verts.remove(v.index());

            let shift = |id: &mut VertId| {
                if *id > v {
                    *id = VertId(id.0 - 1);
                }
            };
            for edge in &mut self.edges.items {
                edge.verts.iter_mut().for_each(shift);
            }
            for face in &mut self.faces.items {
                face.verts.iter_mut().for_each(shift);
            }
            Ok(())
        }

        #[inline]
        fn check_vert(&self, v: VertId) -> Result<(), MeshError> {
            self.check(ElementHandle::Vert(v))
        }

        #[inline]
        fn check(&self, handle: ElementHandle) -> Result<(), MeshError> {
            if self.contains(handle) {
                Ok(())
            } else {
                Err(MeshError::StaleHandle {
                    kind: handle.kind(),
                    index: handle.index(),
                })
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn two_triangles() -> (Mesh, [VertId; 4]) {
            let mut mesh = Mesh::new();
            let a = mesh.add_vert(DVec3::new(0.0, 0.0, 0.0));
            let b = mesh.add_vert(DVec3::new(1.0, 0.0, 0.0));
            let c = mesh.add_vert(DVec3::new(1.0, 1.0, 0.0));
            let d = mesh.add_vert(DVec3::new(0.0, 1.0, 0.0));
            mesh.add_face(&[a, b, c]).unwrap();
            mesh.add_face(&[a, c, d]).unwrap();
            (mesh, [a, b, c, d])
        }

        #[test]
        fn cube_has_expected_topology() {
            let cube = Mesh::cube(2.0);
            assert_eq!(cube.count(MeshKind::Vert), 8);
            assert_eq!(cube.count(MeshKind::Edge), 12);
            assert_eq!(cube.count(MeshKind::Face), 6);
            for (id, _) in cube.verts() {
                assert_eq!(cube.vert_link_faces(id).len(), 3);
            }
            for (id, _) in cube.edges() {
                assert_eq!(cube.edge_link_faces(id).len(), 2);
            }
        }

        #[test]
        fn oversized_index_has_no_handle() {
            assert_eq!(
                MeshKind::Vert.try_handle(7),
                Some(ElementHandle::Vert(VertId::new(7)))
            );
            let too_large = u32::MAX as usize + 1;
            assert_eq!(MeshKind::Vert.try_handle(too_large), None);
            assert_eq!(MeshKind::Face.try_handle(too_large), None);
            assert_eq!(EdgeId::try_from_index(u32::MAX as usize), Some(EdgeId::new(u32::MAX)));
        }

        #[test]
        fn add_face_shares_existing_edges() {
            let (mesh, [a, _, c, _]) = two_triangles();
            assert_eq!(mesh.count(MeshKind::Edge), 5);
            let diagonal = mesh.find_edge(a, c).expect("diagonal edge");
            assert_eq!(mesh.edge_link_faces(diagonal).len(), 2);
            assert_eq!(mesh.vert_link_faces(a).len(), 2);
        }

        #[test]
        fn degenerate_input_is_rejected() {
            let (mut mesh, [a, b, _, _]) = two_triangles();
            assert_eq!(mesh.add_edge(a, a), Err(MeshError::DegenerateEdge));
            assert!(matches!(
                mesh.add_face(&[a, b, a]),
                Err(MeshError::DegenerateFace(2))
            ));
            assert!(matches!(
                mesh.add_edge(a, VertId::new(99)),
                Err(MeshError::StaleHandle { .. })
            ));
        }

        #[test]
        fn removing_a_vertex_renumbers_and_keeps_layers_aligned() {
            let (mut mesh, [a, b, c, d]) = two_triangles();
            let layer = mesh.add_int_layer(MeshKind::Vert, "tag").unwrap();
            for (value, v) in [a, b, c, d].into_iter().enumerate() {
                mesh.set_layer_value(ElementHandle::Vert(v), layer, value as i64 + 10)
                    .unwrap();
            }

            mesh.remove_vert(b).unwrap();

            assert_eq!(mesh.count(MeshKind::Vert), 3);
            assert_eq!(mesh.count(MeshKind::Face), 1);
            assert_eq!(mesh.count(MeshKind::Edge), 3);
            let tags: Vec<i64> = mesh
                .handles(MeshKind::Vert)
                .map(|h| mesh.layer_value(h, layer).unwrap())
                .collect();
            assert_eq!(tags, vec![10, 12, 13]);
            let (_, face) = mesh.faces().next().unwrap();
            assert_eq!(face.verts, vec![VertId::new(0), VertId::new(1), VertId::new(2)]);
        }

        #[test]
        fn removing_an_edge_drops_linked_faces_only() {
            let (mut mesh, [a, _, c, _]) = two_triangles();
            let diagonal = mesh.find_edge(a, c).unwrap();
            mesh.remove_edge(diagonal).unwrap();
            assert_eq!(mesh.count(MeshKind::Face), 0);
            assert_eq!(mesh.count(MeshKind::Edge), 4);
            assert_eq!(mesh.count(MeshKind::Vert), 4);
        }

        #[test]
        fn layer_group_is_bounded() {
            let mut mesh = Mesh::cube(1.0);
            for i in 0..MAX_LAYERS_PER_KIND {
                mesh.add_int_layer(MeshKind::Face, &format!("layer{i}"))
                    .unwrap();
            }
            assert_eq!(
                mesh.add_int_layer(MeshKind::Face, "overflow"),
                Err(MeshError::LayerLimit {
                    kind: MeshKind::Face
                })
            );
            assert!(matches!(
                mesh.add_int_layer(MeshKind::Face, "layer0"),
                Err(MeshError::DuplicateLayer { .. })
            ));
        }

        #[test]
        fn new_elements_start_with_zero_in_existing_layers() {
            let mut mesh = Mesh::cube(1.0);
            let layer = mesh.add_int_layer(MeshKind::Vert, "tag").unwrap();
            let v = mesh.add_vert(DVec3::ZERO);
            assert_eq!(mesh.layer_value(ElementHandle::Vert(v), layer), Some(0));
        }
    }
}

pub mod scene {
    use indexmap::IndexMap;
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    use crate::hide_set::HideSetStore;
    use crate::mesh::Mesh;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum VisibilityError {
        #[error("object {0:?} is not linked into the active view layer")]
        NotInViewLayer(String),
        #[error("visibility strategy {0} is not supported by this element")]
        Unsupported(&'static str),
    }

    /// 交互模式：对象模式或网格编辑模式。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub enum InteractionMode {
        #[default]
        Object,
        EditMesh,
    }

    /// 场景中的一个对象，可能携带网格数据。
    ///
    /// `mesh` 为持久化网格；对象处于编辑模式时，`edit_mesh` 保存宿主的实时编辑副本。
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Object {
        name: String,
        #[serde(default)]
        pub hide_viewport: bool,
        #[serde(default)]
        view_layer_hidden: bool,
        #[serde(default = "Object::default_in_view_layer")]
        pub in_view_layer: bool,
        #[serde(default)]
        pub select: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mesh: Option<Mesh>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        edit_mesh: Option<Mesh>,
    }

    impl Object {
        fn default_in_view_layer() -> bool {
            true
        }

        pub fn new_empty(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                hide_viewport: false,
                view_layer_hidden: false,
                in_view_layer: true,
                select: false,
                mesh: None,
                edit_mesh: None,
            }
        }

        pub fn new_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
            Self {
                mesh: Some(mesh),
                ..Self::new_empty(name)
            }
        }

        #[inline]
        pub fn name(&self) -> &str {
            &self.name
        }

        #[inline]
        pub fn is_mesh(&self) -> bool {
            self.mesh.is_some() || self.edit_mesh.is_some()
        }

        #[inline]
        pub fn mesh(&self) -> Option<&Mesh> {
            self.mesh.as_ref()
        }

        #[inline]
        pub fn mesh_mut(&mut self) -> Option<&mut Mesh> {
            self.mesh.as_mut()
        }

        #[inline]
        pub fn edit_mesh(&self) -> Option<&Mesh> {
            self.edit_mesh.as_ref()
        }

        #[inline]
        pub fn edit_mesh_mut(&mut self) -> Option<&mut Mesh> {
            self.edit_mesh.as_mut()
        }

        #[inline]
        pub fn is_in_edit_mode(&self) -> bool {
            self.edit_mesh.is_some()
        }

        /// 当前生效的网格：编辑模式下为实时编辑副本，否则为持久化网格。
        #[inline]
        pub fn current_mesh(&self) -> Option<&Mesh> {
            self.edit_mesh.as_ref().or(self.mesh.as_ref())
        }

        #[inline]
        pub fn current_mesh_mut(&mut self) -> Option<&mut Mesh> {
            match self.edit_mesh {
                Some(ref mut mesh) => Some(mesh),
                None => self.mesh.as_mut(),
            }
        }

        /// 视图层中的隐藏状态，对象未链接到视图层时失败。
        pub fn hide_get(&self) -> Result<bool, VisibilityError> {
            if !self.in_view_layer {
                return Err(VisibilityError::NotInViewLayer(self.name.clone()));
            }
            Ok(self.view_layer_hidden)
        }

        pub fn hide_set(&mut self, hidden: bool) -> Result<(), VisibilityError> {
            if !self.in_view_layer {
                return Err(VisibilityError::NotInViewLayer(self.name.clone()));
            }
            self.view_layer_hidden = hidden;
            Ok(())
        }

        /// 进入编辑模式：把持久化网格复制为实时编辑副本。非网格对象返回 false。
        pub fn begin_edit(&mut self) -> bool {
            if self.edit_mesh.is_some() {
                return true;
            }
            match &self.mesh {
                Some(mesh) => {
                    self.edit_mesh = Some(mesh.clone());
                    true
                }
                None => false,
            }
        }

        /// 退出编辑模式并把编辑副本写回持久化网格。
        pub fn end_edit(&mut self) {
            if let Some(edited) = self.edit_mesh.take() {
                self.mesh = Some(edited);
            }
        }

        /// 不退出编辑模式，仅把编辑副本同步到持久化网格。
        pub fn update_from_edit_mode(&mut self) {
            if let Some(edited) = &self.edit_mesh {
                self.mesh = Some(edited.clone());
            }
        }

        /// 用新网格替换持久化网格。
        pub fn set_mesh(&mut self, mesh: Mesh) {
            self.mesh = Some(mesh);
        }
    }

    /// 按名称索引、保持插入顺序的对象集合。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ObjectCollection {
        objects: IndexMap<String, Object>,
    }

    impl ObjectCollection {
        /// 插入对象，同名对象会被替换并返回。
        pub fn insert(&mut self, object: Object) -> Option<Object> {
            self.objects.insert(object.name.clone(), object)
        }

        pub fn remove(&mut self, name: &str) -> Option<Object> {
            self.objects.shift_remove(name)
        }

        #[inline]
        pub fn get(&self, name: &str) -> Option<&Object> {
            self.objects.get(name)
        }

        #[inline]
        pub fn get_mut(&mut self, name: &str) -> Option<&mut Object> {
            self.objects.get_mut(name)
        }

        #[inline]
        pub fn contains(&self, name: &str) -> bool {
            self.objects.contains_key(name)
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.objects.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.objects.is_empty()
        }

        pub fn iter(&self) -> impl Iterator<Item = &Object> {
            self.objects.values()
        }

        pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Object> {
            self.objects.values_mut()
        }
    }

    /// 场景：对象集合、交互模式以及场景级的隐藏集合存储。
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct Scene {
        objects: ObjectCollection,
        #[serde(default)]
        mode: InteractionMode,
        #[serde(default)]
        objects_in_mode: Vec<String>,
        #[serde(default)]
        hide_sets: HideSetStore,
    }

    impl Scene {
        pub fn new() -> Self {
            Self::default()
        }

        #[inline]
        pub fn objects(&self) -> &ObjectCollection {
            &self.objects
        }

        #[inline]
        pub fn objects_mut(&mut self) -> &mut ObjectCollection {
            &mut self.objects
        }

        #[inline]
        pub fn hide_sets(&self) -> &HideSetStore {
            &self.hide_sets
        }

        #[inline]
        pub fn hide_sets_mut(&mut self) -> &mut HideSetStore {
            &mut self.hide_sets
        }

        /// 同时借出对象集合与隐藏集合存储。
        #[inline]
        pub fn parts_mut(&mut self) -> (&mut ObjectCollection, &mut HideSetStore) {
            (&mut self.objects, &mut self.hide_sets)
        }

        #[inline]
        pub fn mode(&self) -> InteractionMode {
            self.mode
        }

        /// 多对象编辑列表；仅在编辑模式下非空。
        #[inline]
        pub fn objects_in_mode(&self) -> &[String] {
            &self.objects_in_mode
        }

        pub fn add_object(&mut self, object: Object) -> Option<Object> {
            self.objects.insert(object)
        }

        pub fn set_selected(&mut self, name: &str, selected: bool) -> bool {
            match self.objects.get_mut(name) {
                Some(object) => {
                    object.select = selected;
                    true
                }
                None => false,
            }
        }

        pub fn deselect_all(&mut self) {
            self.objects.iter_mut().for_each(|object| object.select = false);
        }

        pub fn selected_object_names(&self) -> Vec<String> {
            self.objects
                .iter()
                .filter(|object| object.select)
                .map(|object| object.name().to_string())
                .collect()
        }

        /// 让指定网格对象进入编辑模式，返回实际进入的对象数。
        pub fn enter_edit_mode<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
            let mut entered = 0;
            for name in names {
                let name = name.as_ref();
                let Some(object) = self.objects.get_mut(name) else {
                    continue;
                };
                if object.begin_edit() {
                    if !self.objects_in_mode.iter().any(|entry| entry == name) {
                        self.objects_in_mode.push(name.to_string());
                    }
                    entered += 1;
                }
            }
            if !self.objects_in_mode.is_empty() {
                self.mode = InteractionMode::EditMesh;
            }
            entered
        }

        /// 退出编辑模式，所有编辑副本写回持久化网格。
        pub fn exit_edit_mode(&mut self) {
            for name in self.objects_in_mode.drain(..) {
                if let Some(object) = self.objects.get_mut(&name) {
                    object.end_edit();
                }
            }
            self.mode = InteractionMode::Object;
        }
    }

}

pub mod hide_set {
    use std::fmt;
    use std::str::FromStr;

    use indexmap::IndexMap;
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    use crate::mesh::MeshKind;

    /// 对象类引用不使用持久 ID，约定写入 -1。
    pub const OBJECT_PID: i64 = -1;

    /// 隐藏集合成员的元素类别，同时也是集合的模式。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum ElementKind {
        #[serde(rename = "VERT")]
        Vert,
        #[serde(rename = "EDGE")]
        Edge,
        #[serde(rename = "FACE")]
        Face,
        #[serde(rename = "OBJECT")]
        Object,
    }

    impl ElementKind {
        #[inline]
        pub fn as_str(self) -> &'static str {
            match self {
                ElementKind::Vert => "VERT",
                ElementKind::Edge => "EDGE",
                ElementKind::Face => "FACE",
                ElementKind::Object => "OBJECT",
            }
        }

        /// 面板上显示的名称。
        #[inline]
        pub fn label(self) -> &'static str {
            match self {
                ElementKind::Vert => "顶点",
                ElementKind::Edge => "边",
                ElementKind::Face => "面",
                ElementKind::Object => "对象",
            }
        }

        #[inline]
        pub fn mesh_kind(self) -> Option<MeshKind> {
            match self {
                ElementKind::Vert => Some(MeshKind::Vert),
                ElementKind::Edge => Some(MeshKind::Edge),
                ElementKind::Face => Some(MeshKind::Face),
                ElementKind::Object => None,
            }
        }

        #[inline]
        pub fn is_mesh(self) -> bool {
            self.mesh_kind().is_some()
        }
    }

    impl From<MeshKind> for ElementKind {
        fn from(kind: MeshKind) -> Self {
            match kind {
                MeshKind::Vert => ElementKind::Vert,
                MeshKind::Edge => ElementKind::Edge,
                MeshKind::Face => ElementKind::Face,
            }
        }
    }

    impl fmt::Display for ElementKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    #[error("unknown element kind {0:?}")]
    pub struct ParseKindError(pub String);

    impl FromStr for ElementKind {
        type Err = ParseKindError;

        fn from_str(value: &str) -> Result<Self, Self::Err> {
            match value.to_ascii_uppercase().as_str() {
                "VERT" | "VERTEX" => Ok(ElementKind::Vert),
                "EDGE" => Ok(ElementKind::Edge),
                "FACE" => Ok(ElementKind::Face),
                "OBJECT" => Ok(ElementKind::Object),
                _ => Err(ParseKindError(value.to_string())),
            }
        }
    }

    /// 隐藏集合中的一条成员引用。
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ElementRef {
        pub object_name: String,
        pub kind: ElementKind,
        pub pid: i64,
        pub saved_hidden: bool,
    }

    impl ElementRef {
        pub fn object(object_name: impl Into<String>, saved_hidden: bool) -> Self {
            Self {
                object_name: object_name.into(),
                kind: ElementKind::Object,
                pid: OBJECT_PID,
                saved_hidden,
            }
        }

        pub fn mesh(
            object_name: impl Into<String>,
            kind: MeshKind,
            pid: i64,
            saved_hidden: bool,
        ) -> Self {
            Self {
                object_name: object_name.into(),
                kind: kind.into(),
                pid,
                saved_hidden,
            }
        }

        #[inline]
        pub fn same_target(&self, other: &ElementRef) -> bool {
            self.object_name == other.object_name && self.kind == other.kind && self.pid == other.pid
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum HideSetError {
        #[error("{found} reference cannot join a {expected} hide set")]
        KindMismatch {
            expected: ElementKind,
            found: ElementKind,
        },
        #[error("mesh reference on {object:?} has no persistent id ({pid})")]
        UnassignedPid { object: String, pid: i64 },
    }

    /// 具名、定型的隐藏集合。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct HideSet {
        name: String,
        mode: ElementKind,
        #[serde(default)]
        elements: Vec<ElementRef>,
    }

    impl HideSet {
        pub fn new(name: impl Into<String>, mode: ElementKind) -> Self {
            Self {
                name: name.into(),
                mode,
                elements: Vec::new(),
            }
        }

        #[inline]
        pub fn name(&self) -> &str {
            &self.name
        }

        #[inline]
        pub fn set_name(&mut self, name: impl Into<String>) {
            self.name = name.into();
        }

        #[inline]
        pub fn mode(&self) -> ElementKind {
            self.mode
        }

        #[inline]
        pub fn elements(&self) -> &[ElementRef] {
            &self.elements
        }

        /// 可修改 `saved_hidden` 等字段，但不能改变成员数量。
        #[inline]
        pub fn elements_mut(&mut self) -> &mut [ElementRef] {
            &mut self.elements
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.elements.len()
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.elements.is_empty()
        }

        /// 追加成员；(对象, 类别, ID) 已存在时不插入并返回 `Ok(false)`。
        pub fn add_unique(&mut self, element: ElementRef) -> Result<bool, HideSetError> {
            if element.kind != self.mode {
                return Err(HideSetError::KindMismatch {
                    expected: self.mode,
                    found: element.kind,
                });
            }
            if element.kind.is_mesh() && element.pid <= 0 {
                return Err(HideSetError::UnassignedPid {
                    object: element.object_name,
                    pid: element.pid,
                });
            }
            if self.elements.iter().any(|it| it.same_target(&element)) {
                return Ok(false);
            }
            self.elements.push(element);
            Ok(true)
        }

        /// 按下标批量删除，从大到小执行以免下标漂移。返回实际删除数量。
        pub fn remove_indices(&mut self, mut indices: Vec<usize>) -> usize {
            indices.sort_unstable_by(|a, b| b.cmp(a));
            indices.dedup();
            let mut removed = 0;
            for index in indices {
                if index < self.elements.len() {
                    self.elements.remove(index);
                    removed += 1;
                }
            }
            removed
        }

        /// 按对象名分组，组内保持原有顺序，组按首次出现排序。
        pub fn split_by_object(&self) -> IndexMap<&str, Vec<&ElementRef>> {
            let mut groups: IndexMap<&str, Vec<&ElementRef>> = IndexMap::new();
            for element in &self.elements {
                groups
                    .entry(element.object_name.as_str())
                    .or_default()
                    .push(element);
            }
            groups
        }

        /// 与 [`HideSet::split_by_object`] 相同的分组，返回成员下标。
        pub fn group_indices_by_object(&self) -> IndexMap<String, Vec<usize>> {
            let mut groups: IndexMap<String, Vec<usize>> = IndexMap::new();
            for (index, element) in self.elements.iter().enumerate() {
                groups
                    .entry(element.object_name.clone())
                    .or_default()
                    .push(index);
            }
            groups
        }
    }

    /// 场景级的下一个持久 ID。单调递增，从不回收。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PidCounter(i64);

    impl Default for PidCounter {
        fn default() -> Self {
            Self(1)
        }
    }

    impl PidCounter {
        /// 保留原始值；读取时会把小于 1 的值钳制为 1。
        #[inline]
        pub fn new(next: i64) -> Self {
            Self(next)
        }

        #[inline]
        pub fn peek(&self) -> i64 {
            self.0.max(1)
        }

        /// 下一个可发放的 ID；计数器已到 `i64::MAX` 时返回 `None`。
        #[inline]
        pub fn available(&self) -> Option<i64> {
            let id = self.peek();
            id.checked_add(1).map(|_| id)
        }

        /// 发放一个新 ID 并推进计数器。耗尽后不再发放，计数器保持不变。
        #[inline]
        pub fn issue(&mut self) -> Option<i64> {
            let id = self.peek();
            self.0 = id.checked_add(1)?;
            Some(id)
        }
    }

    /// 隐藏集合所在的列表：编辑模式集合或对象模式集合。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum ListKind {
        Edit,
        Object,
    }

    impl ListKind {
        #[inline]
        pub fn for_mode(mode: ElementKind) -> Self {
            if mode.is_mesh() {
                ListKind::Edit
            } else {
                ListKind::Object
            }
        }

        #[inline]
        pub fn as_str(self) -> &'static str {
            match self {
                ListKind::Edit => "EDIT",
                ListKind::Object => "OBJECT",
            }
        }
    }

    impl FromStr for ListKind {
        type Err = ParseKindError;

        fn from_str(value: &str) -> Result<Self, Self::Err> {
            match value.to_ascii_uppercase().as_str() {
                "EDIT" => Ok(ListKind::Edit),
                "OBJECT" => Ok(ListKind::Object),
                _ => Err(ParseKindError(value.to_string())),
            }
        }
    }

    /// 场景级持久状态：两组隐藏集合与持久 ID 计数器。
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct HideSetStore {
        #[serde(default)]
        edit_sets: Vec<HideSet>,
        #[serde(default)]
        object_sets: Vec<HideSet>,
        #[serde(default)]
        next_id: PidCounter,
    }

    impl HideSetStore {
        #[inline]
        pub fn list(&self, kind: ListKind) -> &[HideSet] {
            match kind {
                ListKind::Edit => &self.edit_sets,
                ListKind::Object => &self.object_sets,
            }
        }

        #[inline]
        pub fn get(&self, kind: ListKind, index: usize) -> Option<&HideSet> {
            self.list(kind).get(index)
        }

        #[inline]
        pub fn get_mut(&mut self, kind: ListKind, index: usize) -> Option<&mut HideSet> {
            match kind {
                ListKind::Edit => self.edit_sets.get_mut(index),
                ListKind::Object => self.object_sets.get_mut(index),
            }
        }

        /// 按集合模式放入对应列表，返回其位置。
        pub fn push(&mut self, set: HideSet) -> (ListKind, usize) {
            let kind = ListKind::for_mode(set.mode());
            let list = match kind {
                ListKind::Edit => &mut self.edit_sets,
                ListKind::Object => &mut self.object_sets,
            };
            list.push(set);
            (kind, list.len() - 1)
        }

        pub fn remove(&mut self, kind: ListKind, index: usize) -> Option<HideSet> {
            let list = match kind {
                ListKind::Edit => &mut self.edit_sets,
                ListKind::Object => &mut self.object_sets,
            };
            (index < list.len()).then(|| list.remove(index))
        }

        #[inline]
        pub fn len(&self, kind: ListKind) -> usize {
            self.list(kind).len()
        }

        #[inline]
        pub fn counter(&self) -> PidCounter {
            self.next_id
        }

        #[inline]
        pub fn counter_mut(&mut self) -> &mut PidCounter {
            &mut self.next_id
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn add_unique_ignores_duplicates() {
            let mut set = HideSet::new("Legs", ElementKind::Vert);
            let first = ElementRef::mesh("Cube", MeshKind::Vert, 3, false);
            assert_eq!(set.add_unique(first.clone()), Ok(true));
            assert_eq!(set.add_unique(first), Ok(false));
            assert_eq!(set.len(), 1);
            // 保存状态不同但目标相同，仍视为重复。
            assert_eq!(
                set.add_unique(ElementRef::mesh("Cube", MeshKind::Vert, 3, true)),
                Ok(false)
            );
            assert_eq!(
                set.add_unique(ElementRef::mesh("Plane", MeshKind::Vert, 3, true)),
                Ok(true)
            );
            assert_eq!(set.len(), 2);
        }

        #[test]
        fn add_unique_rejects_invalid_references() {
            let mut set = HideSet::new("Faces", ElementKind::Face);
            assert!(matches!(
                set.add_unique(ElementRef::mesh("Cube", MeshKind::Vert, 1, false)),
                Err(HideSetError::KindMismatch { .. })
            ));
            assert!(matches!(
                set.add_unique(ElementRef::mesh("Cube", MeshKind::Face, 0, false)),
                Err(HideSetError::UnassignedPid { .. })
            ));
            assert!(set.is_empty());

            let mut objects = HideSet::new("Props", ElementKind::Object);
            assert_eq!(objects.add_unique(ElementRef::object("Lamp", true)), Ok(true));
            assert_eq!(objects.elements()[0].pid, OBJECT_PID);
        }

        #[test]
        fn split_by_object_preserves_order() {
            let mut set = HideSet::new("Mixed", ElementKind::Edge);
            for (object, pid) in [("B", 1), ("A", 2), ("B", 3), ("A", 4), ("C", 5)] {
                set.add_unique(ElementRef::mesh(object, MeshKind::Edge, pid, false))
                    .unwrap();
            }
            let groups = set.split_by_object();
            let keys: Vec<&str> = groups.keys().copied().collect();
            assert_eq!(keys, vec!["B", "A", "C"]);
            let b: Vec<i64> = groups["B"].iter().map(|it| it.pid).collect();
            assert_eq!(b, vec![1, 3]);

            let indices = set.group_indices_by_object();
            assert_eq!(indices["A"], vec![1, 3]);
        }

        #[test]
        fn remove_indices_handles_unsorted_input() {
            let mut set = HideSet::new("Props", ElementKind::Object);
            for name in ["A", "B", "C", "D"] {
                set.add_unique(ElementRef::object(name, false)).unwrap();
            }
            assert_eq!(set.remove_indices(vec![1, 3, 1, 9]), 2);
            let names: Vec<&str> = set
                .elements()
                .iter()
                .map(|it| it.object_name.as_str())
                .collect();
            assert_eq!(names, vec!["A", "C"]);
        }

        #[test]
        fn counter_clamps_and_never_repeats() {
            let mut counter = PidCounter::new(-7);
            assert_eq!(counter.peek(), 1);
            assert_eq!(counter.issue(), Some(1));
            assert_eq!(counter.issue(), Some(2));
            assert_eq!(counter.peek(), 3);
            assert_eq!(PidCounter::default().peek(), 1);
        }

        #[test]
        fn exhausted_counter_stops_issuing() {
            let mut counter = PidCounter::new(i64::MAX - 1);
            assert_eq!(counter.available(), Some(i64::MAX - 1));
            assert_eq!(counter.issue(), Some(i64::MAX - 1));
            assert_eq!(counter.available(), None);
            assert_eq!(counter.issue(), None);
            assert_eq!(counter.issue(), None);
            assert_eq!(counter.peek(), i64::MAX);
        }

        #[test]
        fn store_routes_sets_by_mode() {
            let mut store = HideSetStore::default();
            assert_eq!(
                store.push(HideSet::new("Verts", ElementKind::Vert)),
                (ListKind::Edit, 0)
            );
            assert_eq!(
                store.push(HideSet::new("Objs", ElementKind::Object)),
                (ListKind::Object, 0)
            );
            assert_eq!(store.len(ListKind::Edit), 1);
            assert!(store.remove(ListKind::Object, 3).is_none());
            assert_eq!(
                store.remove(ListKind::Object, 0).map(|set| set.name().to_string()),
                Some("Objs".to_string())
            );
        }

        #[test]
        fn kinds_parse_case_insensitively() {
            assert_eq!("vert".parse::<ElementKind>(), Ok(ElementKind::Vert));
            assert_eq!("FACE".parse::<ElementKind>(), Ok(ElementKind::Face));
            assert!("corner".parse::<ElementKind>().is_err());
            assert_eq!("edit".parse::<ListKind>(), Ok(ListKind::Edit));
        }
    }
}
