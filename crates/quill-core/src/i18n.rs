//! Interface strings in English and Italian.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    It,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::It => "it",
        }
    }

    /// Cycles to the next supported language.
    pub fn next(self) -> Self {
        match self {
            Language::En => Language::It,
            Language::It => Language::En,
        }
    }
}

const EN: &[(&str, &str)] = &[
    ("nav.home", "Home"),
    ("nav.blogs", "Blogs"),
    ("nav.profile", "Profile"),
    ("nav.create", "Write"),
    ("nav.login", "Log in"),
    ("nav.register", "Sign up"),
    ("nav.logout", "Log out"),
    ("home.title", "Latest posts"),
    ("home.subtitle", "Articles on mathematics, physics, and competitive programming."),
    ("blogs.title", "Blog Posts"),
    ("blogs.search", "Search posts..."),
    ("blogs.filter", "Filter by tags:"),
    ("blogs.clear", "Clear filters"),
    ("blogs.empty", "No posts found matching your criteria."),
    ("post.not_found", "Blog post not found."),
    ("post.comments", "Comments"),
    ("post.add_comment", "Add a comment..."),
    ("post.login_to_comment", "Log in to join the discussion."),
    ("post.confirm_delete", "Delete this post? This cannot be undone."),
    ("profile.posts", "Your posts"),
    ("profile.empty", "You haven't written anything yet."),
    ("form.title", "Title"),
    ("form.content", "Content"),
    ("form.tags", "Tags"),
    ("form.tags_hint", "Enter adds a tag. Example: math, olympiad, physics"),
    ("form.tags_csv_hint", "Separate tags with commas (e.g., technology, programming)"),
    ("form.create", "Create post"),
    ("form.update", "Update post"),
    ("auth.email", "Email"),
    ("auth.password", "Password"),
    ("auth.name", "Name"),
    ("auth.login_title", "Sign in to your account"),
    ("auth.register_title", "Create your account"),
    ("status.loading", "Loading..."),
    ("footer.help", "1-4: pages  Esc: back  g: language  q: quit"),
    ("post.likes", "likes"),
    ("post.replies", "replies"),
    ("post.reply_to", "Reply to"),
    ("post.edit_comment", "Edit comment"),
    ("post.no_comments", "No comments yet."),
    (
        "post.keys",
        "f like  c comment  r reply  F like comment  v replies  E edit comment  X delete comment  e edit  d delete",
    ),
    ("profile.not_found", "User profile not found."),
    ("form.saving", "Saving..."),
    ("form.keys", "Tab: next field  Ctrl+S: save  Esc: cancel"),
    ("auth.signing_in", "Signing in..."),
    ("auth.switch_to_register", "Ctrl+R: create an account"),
    ("auth.switch_to_login", "Ctrl+R: I already have an account"),
    ("auth.fields_required", "All fields are required"),
    ("confirm.title", "Confirm"),
    ("confirm.yes", "delete"),
    ("confirm.no", "cancel"),
    ("notice.welcome", "Welcome"),
    ("notice.signed_out", "Signed out."),
    ("notice.session_expired", "Your session expired. Please log in again."),
    ("notice.login_required", "Log in to do that."),
    ("notice.post_created", "Post published."),
    ("notice.post_updated", "Post updated."),
    ("notice.post_deleted", "Post deleted."),
    ("notice.not_author", "Only the author can edit this post."),
];

const IT: &[(&str, &str)] = &[
    ("nav.home", "Home"),
    ("nav.blogs", "Blog"),
    ("nav.profile", "Profilo"),
    ("nav.create", "Scrivi"),
    ("nav.login", "Accedi"),
    ("nav.register", "Registrati"),
    ("nav.logout", "Esci"),
    ("home.title", "Ultimi articoli"),
    ("home.subtitle", "Articoli di matematica, fisica e programmazione competitiva."),
    ("blogs.title", "Articoli"),
    ("blogs.search", "Cerca articoli..."),
    ("blogs.filter", "Filtra per tag:"),
    ("blogs.clear", "Azzera filtri"),
    ("blogs.empty", "Nessun articolo corrisponde ai criteri."),
    ("post.not_found", "Articolo non trovato."),
    ("post.comments", "Commenti"),
    ("post.add_comment", "Aggiungi un commento..."),
    ("post.login_to_comment", "Accedi per partecipare alla discussione."),
    ("post.confirm_delete", "Eliminare questo articolo? L'operazione è irreversibile."),
    ("profile.posts", "I tuoi articoli"),
    ("profile.empty", "Non hai ancora scritto nulla."),
    ("form.title", "Titolo"),
    ("form.content", "Contenuto"),
    ("form.tags", "Tag"),
    ("form.create", "Crea articolo"),
    ("form.update", "Aggiorna articolo"),
    ("auth.password", "Password"),
    ("auth.name", "Nome"),
    ("auth.login_title", "Accedi al tuo account"),
    ("auth.register_title", "Crea il tuo account"),
    ("status.loading", "Caricamento..."),
    ("post.likes", "mi piace"),
    ("post.replies", "risposte"),
    ("post.reply_to", "Rispondi a"),
    ("post.edit_comment", "Modifica commento"),
    ("post.no_comments", "Ancora nessun commento."),
    (
        "post.keys",
        "f mi piace  c commenta  r rispondi  F mi piace al commento  v risposte  E modifica commento  X elimina commento  e modifica  d elimina",
    ),
    ("profile.not_found", "Profilo utente non trovato."),
    ("form.saving", "Salvataggio..."),
    ("auth.signing_in", "Accesso in corso..."),
    ("auth.fields_required", "Tutti i campi sono obbligatori"),
    ("confirm.title", "Conferma"),
    ("confirm.yes", "elimina"),
    ("confirm.no", "annulla"),
    ("notice.welcome", "Benvenuto"),
    ("notice.signed_out", "Disconnesso."),
    ("notice.session_expired", "Sessione scaduta. Accedi di nuovo."),
    ("notice.login_required", "Accedi per farlo."),
    ("notice.post_created", "Articolo pubblicato."),
    ("notice.post_updated", "Articolo aggiornato."),
    ("notice.post_deleted", "Articolo eliminato."),
    ("notice.not_author", "Solo l'autore può modificare questo articolo."),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Translates `key`; falls back to English, then to the key itself.
pub fn t(language: Language, key: &str) -> String {
    let table = match language {
        Language::En => EN,
        Language::It => IT,
    };
    lookup(table, key)
        .or_else(|| lookup(EN, key))
        .map_or_else(|| key.to_string(), str::to_string)
}
