use uuid::Uuid;

/// Strongly typed ID for categories
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Copy,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct CategoryID(pub Uuid);

impl Default for CategoryID {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryID {
    pub fn new() -> Self {
        CategoryID(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for CategoryID {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CategoryID {
    fn from(id: Uuid) -> Self {
        CategoryID(id)
    }
}

impl std::fmt::Display for CategoryID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed ID for authors
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Copy,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct AuthorID(pub Uuid);

impl Default for AuthorID {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorID {
    pub fn new() -> Self {
        AuthorID(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for AuthorID {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for AuthorID {
    fn from(id: Uuid) -> Self {
        AuthorID(id)
    }
}

impl std::fmt::Display for AuthorID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed ID for publishers
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Copy,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct PublisherID(pub Uuid);

impl Default for PublisherID {
    fn default() -> Self {
        Self::new()
    }
}

impl PublisherID {
    pub fn new() -> Self {
        PublisherID(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for PublisherID {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for PublisherID {
    fn from(id: Uuid) -> Self {
        PublisherID(id)
    }
}

impl std::fmt::Display for PublisherID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed ID for books
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Copy,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct BookID(pub Uuid);

impl Default for BookID {
    fn default() -> Self {
        Self::new()
    }
}

impl BookID {
    pub fn new() -> Self {
        BookID(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for BookID {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for BookID {
    fn from(id: Uuid) -> Self {
        BookID(id)
    }
}

impl std::fmt::Display for BookID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed ID for book reviews
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Copy,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct ReviewID(pub Uuid);

impl Default for ReviewID {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewID {
    pub fn new() -> Self {
        ReviewID(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for ReviewID {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ReviewID {
    fn from(id: Uuid) -> Self {
        ReviewID(id)
    }
}

impl std::fmt::Display for ReviewID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed ID for book images
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Copy,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct ImageID(pub Uuid);

impl Default for ImageID {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageID {
    pub fn new() -> Self {
        ImageID(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for ImageID {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ImageID {
    fn from(id: Uuid) -> Self {
        ImageID(id)
    }
}

impl std::fmt::Display for ImageID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
