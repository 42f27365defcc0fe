use crate::hw::{OpenMode, Peer, Storage};

/// Exclusive use of the storage bus.
///
/// The peer channel is suspended before storage starts and resumed only after
/// storage has been shut down, whichever way the session ends.
pub struct StorageSession<'a, SD, P>
where
    SD: Storage,
    P: Peer,
{
    storage: &'a mut SD,
    peer: &'a mut P,
}

impl<'a, SD, P> StorageSession<'a, SD, P>
where
    SD: Storage,
    P: Peer,
{
    pub fn open(storage: &'a mut SD, peer: &'a mut P) -> Result<Self, SD::Error> {
        debug!("suspending {} for {}", P::NAME, SD::NAME);
        peer.suspend();
        if let Err(err) = storage.begin() {
            peer.resume();
            return Err(err);
        }
        Ok(StorageSession { storage, peer })
    }

    pub fn open_file(
        &mut self,
        path: &str,
        mode: OpenMode,
        create: bool,
    ) -> Result<SD::File, SD::Error> {
        self.storage.open(path, mode, create)
    }

    pub fn write(&mut self, file: &mut SD::File, data: &[u8]) -> Result<(), SD::Error> {
        self.storage.write(file, data)
    }

    pub fn close(&mut self, file: SD::File) -> Result<(), SD::Error> {
        self.storage.close(file)
    }
}

impl<'a, SD, P> Drop for StorageSession<'a, SD, P>
where
    SD: Storage,
    P: Peer,
{
    fn drop(&mut self) {
        self.storage.end();
        self.peer.resume();
        debug!("{} released, {} resumed", SD::NAME, P::NAME);
    }
}
