use std::collections::VecDeque;

use crate::log;

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R: log::Repository> log::Service for Service<R> {
    fn get_log_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.repository.read_entries()
    }

    fn add_log_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        self.repository.write_entry(entry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ::log::Level;
    use pretty_assertions::assert_eq;

    use crate::log::Service as _;

    use super::*;

    #[derive(Default)]
    struct MemoryLog {
        entries: Mutex<VecDeque<log::Entry>>,
    }

    impl log::Repository for MemoryLog {
        fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
            self.entries
                .lock()
                .map(|entries| entries.clone())
                .map_err(|err| log::Error::Unknown(err.to_string()))
        }

        fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
            let mut entries = self
                .entries
                .lock()
                .map_err(|err| log::Error::Unknown(err.to_string()))?;
            log::append(&mut entries, entry);
            Ok(())
        }
    }

    #[test]
    fn test_log_entries() {
        let service = Service::new(MemoryLog::default());

        for i in 0..120 {
            service
                .add_log_entry(log::Entry {
                    time: "Feb 01 08:30:00".to_string(),
                    level: Level::Error,
                    message: format!("failed to create run: {i}"),
                })
                .unwrap();
        }

        let entries = service.get_log_entries().unwrap();
        assert_eq!(entries.len(), 100);
        assert_eq!(entries[0].message, "failed to create run: 119");
        assert_eq!(entries[99].message, "failed to create run: 20");
    }
}
