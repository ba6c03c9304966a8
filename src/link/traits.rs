//! Hub link trait for abstraction and testability
//!
//! The link is the BLE connection to one hub: discovery, connection and
//! GATT plumbing live behind it. The driver only writes whole command frames
//! and asks for notifications on the hub's characteristic; notification
//! bytes are handed back to [`crate::hub::Hub::handle_notification`].

use core::future::Future;

/// Errors that can occur on the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The connection is gone
    Disconnected,
    /// A write was rejected or not delivered
    WriteFailed,
    /// Enabling notifications failed
    SubscribeFailed,
}

/// Abstract BLE link to one hub
pub trait HubLink {
    /// Write a complete frame to a characteristic.
    ///
    /// Success means the bytes were handed to the radio, nothing more.
    fn write(
        &mut self,
        characteristic: &'static str,
        data: &[u8],
    ) -> impl Future<Output = Result<(), LinkError>>;

    /// Enable notifications on a characteristic.
    fn subscribe(&mut self, characteristic: &'static str) -> impl Future<Output = Result<(), LinkError>>;
}

#[cfg(test)]
pub mod mock {
    //! Mock link for testing

    use super::*;

    /// One call made on the mock, in order
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LinkOp {
        Write(&'static str, Vec<u8>),
        Subscribe(&'static str),
    }

    /// Mock link recording every write and subscription
    #[derive(Default)]
    pub struct MockLink {
        ops: Vec<LinkOp>,
        next_write_error: Option<LinkError>,
        next_subscribe_error: Option<LinkError>,
    }

    impl MockLink {
        pub fn new() -> Self {
            Self::default()
        }

        /// All calls so far
        pub fn ops(&self) -> &[LinkOp] {
            &self.ops
        }

        /// Bytes of every successful write, in order
        pub fn writes(&self) -> Vec<Vec<u8>> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    LinkOp::Write(_, data) => Some(data.clone()),
                    LinkOp::Subscribe(_) => None,
                })
                .collect()
        }

        pub fn clear(&mut self) {
            self.ops.clear();
        }

        /// Set an error to be returned by the next write() call
        pub fn set_next_write_error(&mut self, error: LinkError) {
            self.next_write_error = Some(error);
        }

        /// Set an error to be returned by the next subscribe() call
        pub fn set_next_subscribe_error(&mut self, error: LinkError) {
            self.next_subscribe_error = Some(error);
        }
    }

    impl HubLink for MockLink {
        async fn write(&mut self, characteristic: &'static str, data: &[u8]) -> Result<(), LinkError> {
            if let Some(error) = self.next_write_error.take() {
                return Err(error);
            }
            self.ops.push(LinkOp::Write(characteristic, data.to_vec()));
            Ok(())
        }

        async fn subscribe(&mut self, characteristic: &'static str) -> Result<(), LinkError> {
            if let Some(error) = self.next_subscribe_error.take() {
                return Err(error);
            }
            self.ops.push(LinkOp::Subscribe(characteristic));
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mock_records_in_order() {
            let mut link = MockLink::new();

            futures::executor::block_on(async {
                link.write("c", &[0x01, 0x02]).await.unwrap();
                link.subscribe("c").await.unwrap();

                assert_eq!(
                    link.ops(),
                    &[LinkOp::Write("c", vec![0x01, 0x02]), LinkOp::Subscribe("c")]
                );
            });
        }

        #[test]
        fn test_mock_write_error() {
            let mut link = MockLink::new();

            futures::executor::block_on(async {
                link.set_next_write_error(LinkError::WriteFailed);

                let result = link.write("c", &[0x01]).await;
                assert_eq!(result, Err(LinkError::WriteFailed));

                // Error should be cleared
                link.write("c", &[0x02]).await.unwrap();
                assert_eq!(link.writes(), vec![vec![0x02]]);
            });
        }
    }
}
