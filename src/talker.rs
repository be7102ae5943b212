use serde::{Deserialize, Serialize};

/// A single talker in the collection.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Talker {
    /// The ID of the talker. Assigned once, never changed.
    id: u64,

    /// The name provided.
    name: String,

    /// The age provided.
    age: u32,

    /// The talk given.
    talk: Talk,
}

impl Talker {
    /// Attaches an ID to a submitted talker.
    pub fn from_new(id: u64, new: NewTalker) -> Self {
        Talker {
            id,
            name: new.name,
            age: new.age,
            talk: new.talk,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The talk details nested in a talker record.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Talk {
    /// The date the talk was watched, in dd/mm/yyyy form.
    #[serde(rename = "watchedAt")]
    watched_at: String,

    /// The rating given to the talk, 1 to 5.
    rate: u8,
}

impl Talk {
    pub fn new(watched_at: String, rate: u8) -> Self {
        Talk { watched_at, rate }
    }
}

/// A talker submitted for creation or update, before an ID is attached.
///
/// The payload carries no `id`; the allocator (create) or the path
/// parameter (update) decides it, so an `id` supplied in a request body
/// is ignored.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewTalker {
    name: String,
    age: u32,
    talk: Talk,
}

impl NewTalker {
    pub fn new(name: String, age: u32, talk: Talk) -> Self {
        NewTalker { name, age, talk }
    }
}
