//! Lifecycle bookkeeping for network tasks spawned by the runtime.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Groups of requests that share a spinner slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Auth,
    Posts,
    Post,
    Comments,
    Profile,
}

#[derive(Debug, Clone, Copy)]
pub struct TaskStarted {
    pub id: TaskId,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Tracks the most recent task of one kind. Older tasks of the same kind may
/// still complete; their results are applied but do not clear the slot.
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, started: TaskStarted) {
        self.active = Some(started.id);
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub auth: TaskState,
    pub posts: TaskState,
    pub post: TaskState,
    pub comments: TaskState,
    pub profile: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Auth => &self.auth,
            TaskKind::Posts => &self.posts,
            TaskKind::Post => &self.post,
            TaskKind::Comments => &self.comments,
            TaskKind::Profile => &self.profile,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Auth => &mut self.auth,
            TaskKind::Posts => &mut self.posts,
            TaskKind::Post => &mut self.post,
            TaskKind::Comments => &mut self.comments,
            TaskKind::Profile => &mut self.profile,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.auth.is_running()
            || self.posts.is_running()
            || self.post.is_running()
            || self.comments.is_running()
            || self.profile.is_running()
    }
}
