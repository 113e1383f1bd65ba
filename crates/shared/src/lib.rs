use std::fmt;

use serde::{Deserialize, Serialize};

/// Уникальный идентификатор объекта в сцене
pub type ObjectId = String;

/// Вектор из трёх компонент (позиция, поворот, масштаб)
pub type Vec3 = [f64; 3];

/// Тип геометрии объекта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryType {
    #[default]
    Box,
    Sphere,
    Cylinder,
    Cone,
    Torus,
}

impl GeometryType {
    /// Строковое имя типа (используется в составных ключах трекера)
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Box => "box",
            GeometryType::Sphere => "sphere",
            GeometryType::Cylinder => "cylinder",
            GeometryType::Cone => "cone",
            GeometryType::Torus => "torus",
        }
    }

    /// Все типы геометрии
    pub fn all() -> &'static [GeometryType] {
        &[
            GeometryType::Box,
            GeometryType::Sphere,
            GeometryType::Cylinder,
            GeometryType::Cone,
            GeometryType::Torus,
        ]
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Тип материала объекта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    #[default]
    Normal,
    Phong,
    Standard,
    Basic,
}

impl MaterialType {
    /// Строковое имя типа
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Normal => "normal",
            MaterialType::Phong => "phong",
            MaterialType::Standard => "standard",
            MaterialType::Basic => "basic",
        }
    }

    /// Все типы материалов
    pub fn all() -> &'static [MaterialType] {
        &[
            MaterialType::Normal,
            MaterialType::Phong,
            MaterialType::Standard,
            MaterialType::Basic,
        ]
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_true() -> bool {
    true
}

fn default_scale() -> Vec3 {
    [1.0, 1.0, 1.0]
}

fn default_color() -> String {
    "#ffffff".to_string()
}

/// Узел дерева сцены
///
/// Дочерние узлы принадлежат родителю эксклюзивно: один родитель, без циклов.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Уникальный идентификатор (назначается при создании, не переиспользуется)
    pub id: ObjectId,
    /// Отображаемое имя
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub geometry_type: GeometryType,
    #[serde(default)]
    pub material_type: MaterialType,
    /// Цвет в виде hex-строки (`#rrggbb`)
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub children: Vec<SceneObject>,
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl SceneObject {
    /// Создать узел из частичных данных, заполняя незаданные поля значениями по умолчанию
    pub fn from_patch(id: ObjectId, patch: ObjectPatch) -> Self {
        Self {
            id,
            name: patch.name.unwrap_or_default(),
            position: patch.position.unwrap_or([0.0; 3]),
            rotation: patch.rotation.unwrap_or([0.0; 3]),
            scale: patch.scale.unwrap_or_else(default_scale),
            geometry_type: patch.geometry_type.unwrap_or_default(),
            material_type: patch.material_type.unwrap_or_default(),
            color: patch.color.unwrap_or_else(default_color),
            children: patch.children.unwrap_or_default(),
            visible: patch.visible.unwrap_or(true),
        }
    }

    /// Копия узла с другим набором дочерних элементов
    pub fn with_children(&self, children: Vec<SceneObject>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            geometry_type: self.geometry_type,
            material_type: self.material_type,
            color: self.color.clone(),
            children,
            visible: self.visible,
        }
    }

    /// Копия узла с применёнными изменениями.
    /// Дочерние элементы всегда берутся из текущего узла, `patch.children` игнорируется.
    pub fn patched(&self, patch: &ObjectPatch) -> Self {
        Self {
            id: self.id.clone(),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            position: patch.position.unwrap_or(self.position),
            rotation: patch.rotation.unwrap_or(self.rotation),
            scale: patch.scale.unwrap_or(self.scale),
            geometry_type: patch.geometry_type.unwrap_or(self.geometry_type),
            material_type: patch.material_type.unwrap_or(self.material_type),
            color: patch.color.clone().unwrap_or_else(|| self.color.clone()),
            children: self.children.clone(),
            visible: patch.visible.unwrap_or(self.visible),
        }
    }

    /// Найти узел по ID в поддереве (включая сам узел)
    pub fn find(&self, id: &str) -> Option<&SceneObject> {
        if self.id == id {
            return Some(self);
        }
        find_in(&self.children, id)
    }

    /// Количество узлов в поддереве (включая сам узел)
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(SceneObject::subtree_len).sum::<usize>()
    }

    /// Глубина поддерева: 1 для листа
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(SceneObject::depth)
            .max()
            .unwrap_or(0)
    }
}

/// Поиск узла в последовательности деревьев (обход в глубину)
pub fn find_in<'a>(objects: &'a [SceneObject], id: &str) -> Option<&'a SceneObject> {
    objects.iter().find_map(|obj| obj.find(id))
}

/// Частичные данные объекта для создания и обновления
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<GeometryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_type: Option<MaterialType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Учитывается только при создании объекта
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SceneObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl ObjectPatch {
    /// Патч, задающий только имя
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_geometry(mut self, geometry_type: GeometryType) -> Self {
        self.geometry_type = Some(geometry_type);
        self
    }

    pub fn with_material(mut self, material_type: MaterialType) -> Self {
        self.material_type = Some(material_type);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }
}

/// Состояние сцены: корневые объекты и метка последнего изменения
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneData {
    pub root: Vec<SceneObject>,
    /// Время последнего изменения (мс с начала эпохи UNIX)
    #[serde(default)]
    pub last_update_timestamp: u64,
}

impl SceneData {
    /// Найти объект по ID
    pub fn find(&self, id: &str) -> Option<&SceneObject> {
        find_in(&self.root, id)
    }

    /// Проверить наличие объекта
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Общее количество объектов во всех деревьях
    pub fn object_count(&self) -> usize {
        self.root.iter().map(SceneObject::subtree_len).sum()
    }

    /// Все объекты в порядке обхода в глубину
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        let mut stack: Vec<&SceneObject> = self.root.iter().rev().collect();
        std::iter::from_fn(move || {
            let obj = stack.pop()?;
            stack.extend(obj.children.iter().rev());
            Some(obj)
        })
    }

    /// ID родителя объекта: `Some(None)` для корневого, `None` если объект не найден
    pub fn parent_of(&self, id: &str) -> Option<Option<&ObjectId>> {
        if self.root.iter().any(|obj| obj.id == id) {
            return Some(None);
        }
        self.iter()
            .find(|obj| obj.children.iter().any(|child| child.id == id))
            .map(|parent| Some(&parent.id))
    }
}
