use anyhow::anyhow;
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

type Job = Box<dyn FnOnce() + Send + 'static>;

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "(no message)"
    }
}

/// A single background thread which runs submitted jobs one at a time in submission order. A
/// job that panics is logged and the worker carries on with the next one.
pub struct Worker {
    name: String,
    send_job: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn new(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();
        let (send_job, recv_job) = mpsc::channel::<Job>();
        let thread_name = name.clone();
        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            for job in recv_job {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                    log::error!(
                        "job on worker \"{}\" panicked: {}",
                        thread_name,
                        panic_message(payload.as_ref())
                    );
                }
            }
        })?;
        Ok(Self {
            name,
            send_job: Some(send_job),
            handle: Some(handle),
        })
    }

    /// Queue `job` to run after all previously submitted jobs.
    pub fn submit<F>(&self, job: F) -> anyhow::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let send_job = self
            .send_job
            .as_ref()
            .ok_or_else(|| anyhow!("worker \"{}\" is shutting down", self.name))?;
        send_job
            .send(Box::new(job))
            .map_err(|_| anyhow!("worker \"{}\" has stopped", self.name))
    }
}

impl Drop for Worker {
    /// Waits for queued jobs to finish.
    fn drop(&mut self) {
        self.send_job.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("worker \"{}\" panicked", self.name);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    #[test]
    fn jobs_run_in_order_on_one_thread() {
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let worker = Worker::new("test-worker").unwrap();
            for i in 0..5 {
                let log = Arc::clone(&log);
                worker
                    .submit(move || {
                        let name = thread::current().name().map(str::to_string);
                        log.lock().unwrap().push((i, name));
                    })
                    .unwrap();
            }
        }
        let log = log.lock().unwrap();
        assert_eq!(
            log.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
        assert!(log
            .iter()
            .all(|(_, name)| name.as_deref() == Some("test-worker")));
    }

    #[test]
    fn jobs_after_a_panic_still_run() {
        let worker = Worker::new("panicking-worker").unwrap();
        worker.submit(|| panic!("job failed")).unwrap();
        let (send, recv) = mpsc::channel::<()>();
        worker
            .submit(move || {
                let _ = send.send(());
            })
            .unwrap();
        assert!(recv.recv_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn panic_messages_are_extracted() {
        let payload = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload =
            panic::catch_unwind(|| panic!("formatted {}", 1)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "formatted 1");
    }
}
