use crate::model::Value;

/// Where a parsed value came from.
///
/// Exactly one source applies to each [`Binding`]. Sources layer in precedence order: a default
/// is recorded first, an environment variable next, and command line input last, so the final
/// binding for an id always reflects the highest-precedence source that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Came from the input's declared default value.
    Default,
    /// Came from the named environment variable.
    Env(String),
    /// Came from a command line option, under the name as it was typed (no hyphens).
    Option(String),
    /// Appeared as the nth positional argument, starting from 1.
    Positional(usize),
}

/// One resolved input value: the coerced [`Value`], the raw string it came from, and its
/// [`Origin`].
pub struct Binding {
    pub(crate) id: String,
    pub(crate) value: Value,
    pub(crate) raw: String,
    pub(crate) origin: Origin,
}

impl Binding {
    pub(crate) fn new(id: &str, value: Value, raw: &str, origin: Origin) -> Self {
        Self {
            id: id.to_string(),
            value,
            raw: raw.to_string(),
            origin,
        }
    }

    /// The id of the [`InputSchema`](crate::InputSchema) this value resolved against.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The raw string as seen, before coercion.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Where this value came from.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// The coerced value, asserted to be of type `T`.
    ///
    /// # Panics
    /// Panics if the value is not a `T`. The id-to-type mapping is part of the schema contract
    /// the caller authored, so a mismatch is a programming error, not a runtime condition.
    pub fn value<T: 'static>(&self) -> &T {
        match self.value.downcast_ref::<T>() {
            Some(value) => value,
            None => panic!(
                "value for input '{id}' is not a {t}",
                id = self.id,
                t = std::any::type_name::<T>(),
            ),
        }
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("raw", &self.raw)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// The parsed form of one command level.
///
/// Parsing builds one `Invocation` per schema node visited, mirroring the subcommand path
/// taken. Bindings are recorded in resolution order; an id may appear several times (a repeated
/// option, or the same input layered from default, environment, and command line), and later
/// bindings take priority in the single-value accessors.
#[derive(Debug)]
pub struct Invocation {
    name: String,
    bindings: Vec<Binding>,
    surplus: Vec<String>,
    subcommand: Option<Box<Invocation>>,
}

impl Invocation {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bindings: Vec::default(),
            surplus: Vec::default(),
            subcommand: None,
        }
    }

    pub(crate) fn push(&mut self, binding: Binding) {
        self.bindings.push(binding);
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.bindings.iter().any(|b| b.id == id)
    }

    pub(crate) fn set_surplus(&mut self, surplus: Vec<String>) {
        self.surplus = surplus;
    }

    pub(crate) fn set_subcommand(&mut self, subcommand: Invocation) {
        self.subcommand = Some(Box::new(subcommand));
    }

    /// The name of the command this invocation was parsed against.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every resolved binding, in resolution order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Positional tokens left over after all declared positional arguments were filled.
    ///
    /// Only ever populated at the deepest command reached, and only when that command takes
    /// positional arguments. Surplus is returned verbatim, never an error.
    pub fn surplus(&self) -> &[String] {
        &self.surplus
    }

    /// The parsed subcommand, when the schema had subcommands and one was matched.
    pub fn subcommand(&self) -> Option<&Invocation> {
        self.subcommand.as_deref()
    }

    /// Look up the highest-precedence value for `id`, asserted to be of type `T`.
    ///
    /// Returns `None` if no binding carries `id`.
    ///
    /// # Panics
    /// Panics if a binding is found but its value is not a `T` (see [`Binding::value`]).
    pub fn lookup<T: 'static>(&self, id: &str) -> Option<&T> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.id == id)
            .map(|b| b.value::<T>())
    }

    /// Get the highest-precedence value for `id`, asserted to be of type `T`.
    ///
    /// Safe for inputs that are required (parsing would have failed without a value) or carry a
    /// default (there is always at least one binding). For anything else, see [`Self::lookup`].
    ///
    /// # Panics
    /// Panics if no binding carries `id`, or on a type mismatch.
    pub fn get<T: 'static>(&self, id: &str) -> &T {
        match self.lookup(id) {
            Some(value) => value,
            None => panic!("no parsed value for input '{id}'"),
        }
    }

    /// Like [`Self::lookup`], but returns a clone of the value, or `fallback` if `id` has no
    /// binding.
    pub fn get_or<T: Clone + 'static>(&self, id: &str, fallback: T) -> T {
        self.lookup(id).cloned().unwrap_or(fallback)
    }

    /// Like [`Self::get_or`], but the fallback is produced lazily.
    pub fn get_or_else<T, F>(&self, id: &str, fallback: F) -> T
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        self.lookup(id).cloned().unwrap_or_else(fallback)
    }

    /// Iterate over every value recorded for `id`, in resolution order (lowest precedence
    /// first).
    ///
    /// This is the accessor for repeatable options; the single-value accessors only ever see
    /// the final entry.
    ///
    /// # Panics
    /// Panics when yielding a value that is not a `T`.
    pub fn all<'a, T: 'static>(&'a self, id: &'a str) -> impl Iterator<Item = &'a T> + 'a {
        self.bindings
            .iter()
            .filter(move |b| b.id == id)
            .map(|b| b.value::<T>())
    }

    /// Collect every value recorded for `id` into a `Vec`, in resolution order.
    ///
    /// # Panics
    /// Panics if any value for `id` is not a `T`.
    pub fn get_all<T: Clone + 'static>(&self, id: &str) -> Vec<T> {
        self.all::<T>(id).cloned().collect()
    }

    /// The raw string behind the highest-precedence binding for `id`, if any.
    pub fn raw(&self, id: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.id == id)
            .map(|b| b.raw())
    }

    /// The origin of the highest-precedence binding for `id`, if any.
    pub fn origin(&self, id: &str) -> Option<&Origin> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.id == id)
            .map(|b| b.origin())
    }
}
