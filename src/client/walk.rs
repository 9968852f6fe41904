//! Walk driver: subtree iteration via repeated GETNEXT or GETBULK.

use super::Session;
use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::transport::Transport;
use crate::varbind::VarBind;

impl<T: Transport> Session<T> {
    /// Walk the subtree rooted at `root` using GETNEXT, invoking `visit`
    /// for each varbind.
    ///
    /// One request is made per value. The walk ends cleanly when the agent
    /// returns an exception value (endOfMibView, noSuchObject,
    /// noSuchInstance) or an OID outside the subtree. A response OID that
    /// fails to advance past the cursor fails with
    /// [`Error::WalkNotProgressing`]; a non-zero error-status fails with
    /// [`Error::Agent`]; an error from `visit` stops the walk and is
    /// propagated.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use snmp_client::{Session, oid};
    ///
    /// # async fn example() -> snmp_client::Result<()> {
    /// # let session = Session::builder("192.0.2.1").connect().await?;
    /// session
    ///     .walk(&oid!(1, 3, 6, 1, 2, 1, 1), |vb| {
    ///         println!("{}", vb);
    ///         Ok(())
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn walk<F>(&self, root: &Oid, visit: F) -> Result<()>
    where
        F: FnMut(VarBind) -> Result<()>,
    {
        self.walk_subtree(root, false, visit).await
    }

    /// Walk the subtree rooted at `root` using GETBULK, invoking `visit`
    /// for each varbind.
    ///
    /// Values arrive in batches of the session's configured
    /// max-repetitions, making this far fewer round trips than
    /// [`walk`](Self::walk) on v2c agents. Exit conditions match `walk`.
    pub async fn bulk_walk<F>(&self, root: &Oid, visit: F) -> Result<()>
    where
        F: FnMut(VarBind) -> Result<()>,
    {
        self.walk_subtree(root, true, visit).await
    }

    /// [`walk`](Self::walk) with a collecting visitor.
    pub async fn walk_all(&self, root: &Oid) -> Result<Vec<VarBind>> {
        let mut results = Vec::new();
        self.walk(root, |vb| {
            results.push(vb);
            Ok(())
        })
        .await?;
        Ok(results)
    }

    /// [`bulk_walk`](Self::bulk_walk) with a collecting visitor.
    pub async fn bulk_walk_all(&self, root: &Oid) -> Result<Vec<VarBind>> {
        let mut results = Vec::new();
        self.bulk_walk(root, |vb| {
            results.push(vb);
            Ok(())
        })
        .await?;
        Ok(results)
    }

    async fn walk_subtree<F>(&self, root: &Oid, bulk: bool, mut visit: F) -> Result<()>
    where
        F: FnMut(VarBind) -> Result<()>,
    {
        let mut cursor = root.clone();
        let mut emitted: usize = 0;

        loop {
            let request = std::slice::from_ref(&cursor);
            let response = if bulk {
                self.get_bulk(
                    request,
                    self.config.non_repeaters,
                    self.config.max_repetitions,
                )
                .await?
            } else {
                self.get_next(request).await?
            };

            if response.is_error() {
                return Err(Error::Agent {
                    target: Some(self.peer_addr()),
                    status: response.error_status_enum(),
                    index: response.error_index,
                });
            }

            for vb in response.varbinds {
                if vb.value.is_exception() {
                    tracing::debug!(
                        target: "snmp_client::client",
                        peer = %self.peer_addr(),
                        oid = %vb.oid,
                        value = %vb.value,
                        emitted,
                        "walk hit exception value"
                    );
                    return Ok(());
                }

                if !vb.oid.starts_with(root) {
                    tracing::debug!(
                        target: "snmp_client::client",
                        peer = %self.peer_addr(),
                        oid = %vb.oid,
                        emitted,
                        "walk left subtree"
                    );
                    return Ok(());
                }

                // An agent that does not strictly advance would loop forever.
                if vb.oid <= cursor {
                    return Err(Error::WalkNotProgressing {
                        previous: cursor,
                        current: vb.oid,
                    });
                }

                cursor = vb.oid.clone();
                emitted += 1;
                visit(vb)?;
            }
        }
    }
}
