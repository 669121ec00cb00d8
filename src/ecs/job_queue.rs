//! Intrusive FIFO of building jobs
//!
//! Links are keyed by entity id: each queued job stores the id of the job
//! behind it, and the tail's link is always empty.

use ahash::AHashMap;

use crate::ecs::world::Entity;

#[derive(Debug, Clone, Default)]
pub struct JobQueue {
    head: Option<Entity>,
    tail: Option<Entity>,
    next: AHashMap<Entity, Option<Entity>>,
    size: usize,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(&self) -> Option<Entity> {
        self.head
    }

    pub fn tail(&self) -> Option<Entity> {
        self.tail
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn contains(&self, job: Entity) -> bool {
        self.next.contains_key(&job)
    }

    /// The job queued directly behind `job`
    pub fn next_of(&self, job: Entity) -> Option<Entity> {
        self.next.get(&job).copied().flatten()
    }

    /// Append a job; already-queued jobs are left where they are
    pub fn push_back(&mut self, job: Entity) {
        if self.contains(job) {
            return;
        }
        match self.tail {
            Some(tail) => {
                self.next.insert(tail, Some(job));
            }
            None => self.head = Some(job),
        }
        self.next.insert(job, None);
        self.tail = Some(job);
        self.size += 1;
    }

    pub fn pop_front(&mut self) -> Option<Entity> {
        let head = self.head?;
        let after = self.next.remove(&head).flatten();
        self.head = after;
        if after.is_none() {
            self.tail = None;
        }
        self.size -= 1;
        Some(head)
    }

    /// Unlink a job from anywhere in the queue. Returns false if it was not queued.
    pub fn remove(&mut self, job: Entity) -> bool {
        if !self.contains(job) {
            return false;
        }
        if self.head == Some(job) {
            self.pop_front();
            return true;
        }

        let mut prev = self.head;
        while let Some(current) = prev {
            let following = self.next_of(current);
            if following == Some(job) {
                let after = self.next.remove(&job).flatten();
                self.next.insert(current, after);
                if self.tail == Some(job) {
                    self.tail = Some(current);
                }
                self.size -= 1;
                return true;
            }
            prev = following;
        }
        false
    }

    pub fn iter(&self) -> JobQueueIter<'_> {
        JobQueueIter {
            queue: self,
            cursor: self.head,
        }
    }
}

pub struct JobQueueIter<'a> {
    queue: &'a JobQueue,
    cursor: Option<Entity>,
}

impl Iterator for JobQueueIter<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        let current = self.cursor?;
        self.cursor = self.queue.next_of(current);
        Some(current)
    }
}
